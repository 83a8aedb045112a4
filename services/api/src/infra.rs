use lead_radar::error::AppError;
use lead_radar::workflows::assistant::{LeadSnapshot, SnapshotRows};
use lead_radar::workflows::crm::LeadDate;
use lead_radar::workflows::listings::ListingPoolImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts an RFC 3339 instant or a plain `YYYY-MM-DD`. A plain day stays a calendar day
/// until the run's timezone is known.
pub(crate) fn parse_now(raw: &str) -> Result<LeadDate, String> {
    LeadDate::parse(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as an RFC 3339 instant or YYYY-MM-DD"))
}

/// File locations for one snapshot, as given on the command line.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotFiles {
    pub(crate) leads: PathBuf,
    pub(crate) filters: Option<PathBuf>,
    pub(crate) listings: Option<PathBuf>,
}

/// Reads lead and filter rows as JSON arrays; listings may be a JSON array or a
/// search-screen CSV export.
pub(crate) fn load_snapshot(files: &SnapshotFiles) -> Result<LeadSnapshot, AppError> {
    let leads = read_json(&files.leads)?;
    let filters = files
        .filters
        .as_deref()
        .map(read_json)
        .transpose()?
        .unwrap_or(Value::Null);

    let csv_listings = files.listings.as_deref().filter(|path| is_csv(path));
    let json_listings = match files.listings.as_deref() {
        Some(path) if !is_csv(path) => read_json(path)?,
        _ => Value::Null,
    };

    let mut snapshot = LeadSnapshot::from_rows(&SnapshotRows {
        leads,
        filters,
        listings: json_listings,
    })?;

    if let Some(path) = csv_listings {
        snapshot.listings = ListingPoolImporter::from_path(path)?;
    }

    Ok(snapshot)
}

fn read_json(path: &Path) -> Result<Value, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_now_accepts_rfc3339_and_days() {
        let instant = parse_now("2024-05-10T15:00:00-03:00").expect("rfc3339");
        assert_eq!(instant.sort_key(), "2024-05-10T18:00:00.000Z");

        let day = parse_now("2024-05-10").expect("day");
        assert!(matches!(day, LeadDate::Day(_)));

        assert!(parse_now("amanhã").is_err());
    }

    #[test]
    fn csv_detection_uses_extension() {
        assert!(is_csv(Path::new("pool.CSV")));
        assert!(!is_csv(Path::new("pool.json")));
        assert!(!is_csv(Path::new("pool")));
    }

    #[test]
    fn missing_lead_file_is_an_io_error() {
        let files = SnapshotFiles {
            leads: PathBuf::from("./no-such-leads.json"),
            filters: None,
            listings: None,
        };
        assert!(matches!(load_snapshot(&files), Err(AppError::Io(_))));
    }
}

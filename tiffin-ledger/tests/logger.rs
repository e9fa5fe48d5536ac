//! Logger installs once per process; this binary owns that one install

use tiffin_ledger::utils::logger;

#[test]
fn json_logs_land_in_rolling_file() {
    let dir = tempfile::tempdir().unwrap();
    logger::init_logger_with_file(Some("info"), Some(true), dir.path().to_str());

    tracing::error!(user_id = 7, "ledger log line");

    let file = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("tiffin-ledger"))
        })
        .expect("daily log file");
    let contents = std::fs::read_to_string(file).unwrap();
    let line = contents.lines().last().unwrap();
    let json: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(json["fields"]["message"], "ledger log line");
    assert_eq!(json["fields"]["user_id"], 7);
    assert_eq!(json["level"], "ERROR");
}

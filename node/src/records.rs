//! `/records` replies.

use court_store::RecordStore;
use court_types::{Roster, UserRecord};

pub const NO_SUCH_USER: &str = "無此用戶";
pub const NO_RECORDS: &str = "目前沒有任何紀錄";
pub const LOOKUP_FAILED: &str = "查詢紀錄時發生錯誤";
const NO_RECORD: &str = "無紀錄";

fn formatted(record: Option<&UserRecord>) -> String {
    record.map_or_else(|| NO_RECORD.to_string(), UserRecord::summary)
}

/// Build the reply for `/records`, optionally for a single user.
///
/// Store failures are logged and turned into [`LOOKUP_FAILED`].
pub fn records_reply(store: &dyn RecordStore, roster: &Roster, target: Option<&str>) -> String {
    let result = match target.map(str::trim).filter(|t| !t.is_empty()) {
        Some(target) => single(store, roster, target),
        None => everyone(store, roster),
    };
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "records lookup failed");
        LOOKUP_FAILED.to_string()
    })
}

fn single(
    store: &dyn RecordStore,
    roster: &Roster,
    target: &str,
) -> Result<String, court_store::StoreError> {
    let Some(user) = roster.resolve(target) else {
        return Ok(NO_SUCH_USER.to_string());
    };
    let name = roster.display_name(&user);
    Ok(match store.get_user_record(&user)? {
        Some(record) => format!("{name} 的紀錄:\n{}", formatted(Some(&record))),
        None => format!("找不到用戶{name}的紀錄"),
    })
}

fn everyone(store: &dyn RecordStore, roster: &Roster) -> Result<String, court_store::StoreError> {
    let records = store.all_user_records()?;
    if records.is_empty() {
        return Ok(NO_RECORDS.to_string());
    }
    Ok(records
        .iter()
        .map(|record| {
            format!(
                "{} {}",
                roster.display_name(&record.user_id),
                formatted(Some(record))
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

//! Lock-guarded in-memory store.

use chrono::Utc;
use parking_lot::RwLock;

use pantrylink_core::{
    BarcodeRecord, BarcodeStore, LogEntry, ResolutionState, StoreResult, TransactionMode,
};
use pantrylink_core::store::StoredBarcodes;

/// Everything the store tracks, behind one lock.
#[derive(Debug, Default)]
struct Inner {
    records: Vec<BarcodeRecord>,
    logs: Vec<LogEntry>,
    next_record_id: i64,
    next_log_id: i64,
    mode: TransactionMode,
    api_keys: Vec<String>,
}

/// In-memory [`BarcodeStore`] implementation.
///
/// # Example
///
/// ```rust
/// use pantrylink_core::BarcodeStore;
/// use pantrylink_store::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.record_scan("4066600204404", None, None).unwrap();
/// assert!(store.is_unknown_stored("4066600204404").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an API key as valid.
    pub fn add_api_key(&self, key: impl Into<String>) {
        self.inner.write().api_keys.push(key.into());
    }

    /// Inserts a record directly, assigning it an id.
    ///
    /// Scans normally arrive through [`BarcodeStore::record_scan`]; this
    /// is the seam for seeding known or tare records.
    pub fn insert(&self, mut record: BarcodeRecord) -> i64 {
        let mut inner = self.inner.write();
        inner.next_record_id += 1;
        record.id = inner.next_record_id;
        let id = record.id;
        inner.records.push(record);
        id
    }

    /// Attaches a looked-up name to a record, promoting it to `Known`.
    pub fn set_record_name(&self, barcode: &str, name: impl Into<String>) {
        let mut inner = self.inner.write();
        if let Some(record) = inner
            .records
            .iter_mut()
            .find(|r| r.barcode == barcode && r.state != ResolutionState::Tare)
        {
            record.name = Some(name.into());
            record.state = ResolutionState::Known;
        }
    }
}

impl BarcodeStore for MemoryStore {
    fn barcode_by_id(&self, id: i64) -> StoreResult<Option<BarcodeRecord>> {
        Ok(self.inner.read().records.iter().find(|r| r.id == id).cloned())
    }

    fn stored_amount(&self, barcode: &str) -> StoreResult<f64> {
        Ok(self
            .inner
            .read()
            .records
            .iter()
            .find(|r| r.barcode == barcode && r.state != ResolutionState::Tare)
            .map_or(0.0, |r| r.amount))
    }

    fn is_unknown_stored(&self, barcode: &str) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .records
            .iter()
            .any(|r| r.barcode == barcode && r.state != ResolutionState::Tare))
    }

    fn record_scan(
        &self,
        barcode: &str,
        best_before_in_days: Option<i64>,
        price: Option<f64>,
    ) -> StoreResult<BarcodeRecord> {
        let mut inner = self.inner.write();
        if let Some(record) = inner
            .records
            .iter_mut()
            .find(|r| r.barcode == barcode && r.state != ResolutionState::Tare)
        {
            record.amount += 1.0;
            if best_before_in_days.is_some() {
                record.best_before_in_days = best_before_in_days;
            }
            if price.is_some() {
                record.price = price;
            }
            return Ok(record.clone());
        }

        inner.next_record_id += 1;
        let record = BarcodeRecord {
            id: inner.next_record_id,
            barcode: barcode.to_string(),
            amount: 1.0,
            state: ResolutionState::Unknown,
            name: None,
            possible_match: None,
            best_before_in_days,
            price,
            alt_names: None,
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    fn delete_unknown(&self, barcode: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let before = inner.records.len();
        inner
            .records
            .retain(|r| !(r.barcode == barcode && r.state != ResolutionState::Tare));
        Ok(inner.records.len() < before)
    }

    fn delete_barcode(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        Ok(inner.records.len() < before)
    }

    fn stored_barcodes(&self) -> StoreResult<StoredBarcodes> {
        let inner = self.inner.read();
        let mut partitioned = StoredBarcodes::default();
        for record in &inner.records {
            match record.state {
                ResolutionState::Known => partitioned.known.push(record.clone()),
                ResolutionState::Unknown => partitioned.unknown.push(record.clone()),
                ResolutionState::Tare => partitioned.tare.push(record.clone()),
            }
        }
        Ok(partitioned)
    }

    fn save_log(&self, text: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.next_log_id += 1;
        let entry = LogEntry {
            id: inner.next_log_id,
            log: text.to_string(),
            created: Utc::now(),
        };
        inner.logs.push(entry);
        Ok(())
    }

    fn logs_with_id(&self, limit: usize) -> StoreResult<Vec<LogEntry>> {
        let inner = self.inner.read();
        Ok(inner.logs.iter().rev().take(limit).cloned().collect())
    }

    fn transaction_mode(&self) -> StoreResult<TransactionMode> {
        Ok(self.inner.read().mode)
    }

    fn set_transaction_mode(&self, mode: TransactionMode) -> StoreResult<()> {
        self.inner.write().mode = mode;
        Ok(())
    }

    fn is_valid_api_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.inner.read().api_keys.iter().any(|k| k == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_accumulates_amount() {
        let store = MemoryStore::new();
        store.record_scan("123", None, None).unwrap();
        let record = store.record_scan("123", Some(7), Some(1.99)).unwrap();

        assert_eq!(record.amount, 2.0);
        assert_eq!(record.best_before_in_days, Some(7));
        assert_eq!(record.price, Some(1.99));
        assert_eq!(store.stored_amount("123").unwrap(), 2.0);
    }

    #[test]
    fn absent_barcode_has_zero_amount_and_is_not_stored() {
        let store = MemoryStore::new();
        assert_eq!(store.stored_amount("missing").unwrap(), 0.0);
        assert!(!store.is_unknown_stored("missing").unwrap());
    }

    #[test]
    fn zero_amount_record_is_still_stored() {
        let store = MemoryStore::new();
        let mut record = store.record_scan("123", None, None).unwrap();
        record.amount = 0.0;
        store.delete_unknown("123").unwrap();
        store.insert(record);

        assert_eq!(store.stored_amount("123").unwrap(), 0.0);
        assert!(store.is_unknown_stored("123").unwrap());
    }

    #[test]
    fn delete_by_barcode_and_by_id() {
        let store = MemoryStore::new();
        let record = store.record_scan("123", None, None).unwrap();
        store.record_scan("456", None, None).unwrap();

        assert!(store.delete_barcode(record.id).unwrap());
        assert!(!store.delete_barcode(record.id).unwrap());
        assert!(store.delete_unknown("456").unwrap());
        assert!(!store.is_unknown_stored("456").unwrap());
    }

    #[test]
    fn partitions_by_resolution_state() {
        let store = MemoryStore::new();
        store.record_scan("u1", None, None).unwrap();
        store.record_scan("k1", None, None).unwrap();
        store.set_record_name("k1", "Oat Milk");
        store.insert(BarcodeRecord {
            id: 0,
            barcode: "t1".to_string(),
            amount: 0.0,
            state: ResolutionState::Tare,
            name: None,
            possible_match: None,
            best_before_in_days: None,
            price: None,
            alt_names: None,
        });

        let partitioned = store.stored_barcodes().unwrap();
        assert_eq!(partitioned.unknown.len(), 1);
        assert_eq!(partitioned.known.len(), 1);
        assert_eq!(partitioned.tare.len(), 1);
        assert_eq!(partitioned.known[0].name.as_deref(), Some("Oat Milk"));
    }

    #[test]
    fn tare_records_do_not_count_as_unknown() {
        let store = MemoryStore::new();
        store.insert(BarcodeRecord {
            id: 0,
            barcode: "t1".to_string(),
            amount: 0.0,
            state: ResolutionState::Tare,
            name: None,
            possible_match: None,
            best_before_in_days: None,
            price: None,
            alt_names: None,
        });
        assert!(!store.is_unknown_stored("t1").unwrap());
        assert_eq!(store.stored_amount("t1").unwrap(), 0.0);
    }

    #[test]
    fn logs_come_back_newest_first_and_limited() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            store.save_log(&format!("entry {i}")).unwrap();
        }

        let logs = store.logs_with_id(3).unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].log, "entry 5");
        assert_eq!(logs[2].log, "entry 3");
        assert!(logs[0].id > logs[2].id);
    }

    #[test]
    fn transaction_mode_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.transaction_mode().unwrap(), TransactionMode::Consume);
        store.set_transaction_mode(TransactionMode::Purchase).unwrap();
        assert_eq!(store.transaction_mode().unwrap(), TransactionMode::Purchase);
    }

    #[test]
    fn api_key_validation() {
        let store = MemoryStore::new();
        assert!(!store.is_valid_api_key("secret").unwrap());
        store.add_api_key("secret");
        assert!(store.is_valid_api_key("secret").unwrap());
        assert!(!store.is_valid_api_key("other").unwrap());
    }
}

// Helper for generating UUIDv7 (timestamp-sortable UUIDs)
//
// SQLite has no native UUID generation, so all IDs are generated
// app-side. Token records and files benefit from time-ordered IDs
// (stable pagination, insertion-ordered listing), so UUIDv7 is used
// everywhere.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn uuidv7_is_monotonic() {
        let a = uuidv7();
        let b = uuidv7();
        // UUIDv7 embeds timestamp — later IDs sort after earlier ones
        assert!(b >= a);
    }
}

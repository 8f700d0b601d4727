//! Tests for tt-output sinks.

#[cfg(test)]
mod helpers {
    use std::f64::consts::PI;

    use crate::TurnRow;

    pub fn uturn(cat: i64, ucat: i64, isec: i64) -> TurnRow {
        TurnRow { cat, ln_from: ucat, ln_to: -ucat, cost: 0.0, isec, angle: Some(PI) }
    }

    pub fn turn(cat: i64, from: i64, to: i64, angle: Option<f64>) -> TurnRow {
        TurnRow { cat, ln_from: from, ln_to: to, cost: 0.0, isec: 10, angle }
    }
}

#[cfg(test)]
mod memory {
    use super::helpers::{turn, uturn};
    use crate::{MemorySink, OutputError, TurnTableSink};

    #[test]
    fn commit_makes_rows_visible() {
        let mut s = MemorySink::new();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.insert(&turn(2, 1, 2, Some(0.5))).unwrap();
        assert!(s.rows().is_empty(), "rows must stay hidden until commit");
        s.commit().unwrap();
        assert_eq!(s.rows().len(), 2);
        assert!(s.rows()[0].is_uturn());
        assert!(!s.rows()[1].is_uturn());
    }

    #[test]
    fn rollback_discards_rows() {
        let mut s = MemorySink::new();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.rollback().unwrap();
        assert!(s.rows().is_empty());
        assert!(!s.in_transaction());
    }

    #[test]
    fn transaction_misuse() {
        let mut s = MemorySink::new();
        assert!(matches!(s.insert(&uturn(1, 1, 4)), Err(OutputError::NoTransaction)));
        assert!(matches!(s.commit(), Err(OutputError::NoTransaction)));
        s.begin().unwrap();
        assert!(matches!(s.begin(), Err(OutputError::TransactionOpen)));
        s.rollback().unwrap();
        s.rollback().unwrap(); // no transaction: no-op
    }

    #[test]
    fn works_through_mut_ref() {
        fn drive<S: TurnTableSink>(mut sink: S) {
            sink.begin().unwrap();
            sink.insert(&uturn(1, 1, 4)).unwrap();
            sink.commit().unwrap();
        }

        let mut s = MemorySink::new();
        drive(&mut s);
        assert_eq!(s.into_rows().len(), 1);
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::helpers::{turn, uturn};
    use crate::{CsvSink, TurnTableSink};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_and_rows() {
        let dir = tmp();
        let path = dir.path().join("turns.csv");
        let mut s = CsvSink::create(&path).unwrap();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.insert(&turn(2, 1, -2, None)).unwrap();
        s.commit().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["cat", "ln_from", "ln_to", "cost", "isec", "angle"]);

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][2], "-1");
        assert_eq!(&rows[0][4], "4");
        assert!(rows[0][5].starts_with("3.14159"));
        assert_eq!(&rows[1][2], "-2");
        assert_eq!(&rows[1][5], "", "NULL angle is an empty field");
    }

    #[test]
    fn rollback_leaves_header_only() {
        let mut s = CsvSink::from_writer(Vec::new()).unwrap();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.rollback().unwrap();
        let bytes = s.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "cat,ln_from,ln_to,cost,isec,angle\n");
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::helpers::{turn, uturn};
    use crate::{OutputError, SqliteSink, TurnTableSink};

    fn count(s: &SqliteSink) -> i64 {
        s.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", s.table()), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn rows_round_trip_with_null_angle() {
        let mut s = SqliteSink::in_memory("roads_turntable").unwrap();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.insert(&turn(2, 1, 2, None)).unwrap();
        s.commit().unwrap();

        assert_eq!(count(&s), 2);
        let angle: Option<f64> = s
            .connection()
            .query_row("SELECT angle FROM roads_turntable WHERE cat = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(angle, None);
    }

    #[test]
    fn rollback_leaves_table_empty() {
        let mut s = SqliteSink::in_memory("t").unwrap();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.rollback().unwrap();
        assert_eq!(count(&s), 0);
    }

    #[test]
    fn dropped_sink_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("net.db");
        {
            let mut s = SqliteSink::open(&path, "t").unwrap();
            s.begin().unwrap();
            s.insert(&uturn(1, 1, 4)).unwrap();
        }
        let conn = rusqlite::Connection::open(&path).unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn filled_table_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("net.db");
        {
            let mut s = SqliteSink::open(&path, "t").unwrap();
            s.begin().unwrap();
            s.insert(&uturn(1, 1, 4)).unwrap();
            s.commit().unwrap();
        }
        assert!(matches!(
            SqliteSink::open(&path, "t"),
            Err(OutputError::TableNotEmpty { rows: 1, .. })
        ));
        // Another table in the same database is fine.
        assert!(SqliteSink::open(&path, "t2").is_ok());
    }

    #[test]
    fn empty_table_is_reused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("net.db");
        drop(SqliteSink::open(&path, "t").unwrap());
        let mut s = SqliteSink::open(&path, "t").unwrap();
        s.begin().unwrap();
        s.insert(&uturn(1, 1, 4)).unwrap();
        s.commit().unwrap();
        assert_eq!(count(&s), 1);
    }

    #[test]
    fn table_name_is_validated() {
        assert!(matches!(
            SqliteSink::in_memory("t; DROP TABLE x"),
            Err(OutputError::InvalidTableName(_))
        ));
        assert!(SqliteSink::in_memory("9lives").is_err());
        assert!(SqliteSink::in_memory("_ok_1").is_ok());
    }
}

use common::{create_parser, create_table, feed_line, TokenPool, WALL_CLOCK_MICROS};
use strata_ingest::LineEvent::{
    FieldName, FieldValue, Measurement, TagName, TagValue, Timestamp,
};
use strata_storage::{ColumnType, StorageEngine, TableStatus, Value};

mod common;

#[test]
fn type_mismatch_skips_line_but_not_the_writer() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "0.5")],
    );
    // BOOLEAN into a DOUBLE column.
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "true")],
    );
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "2.0")],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.rows[0][0], Value::Double(0.5));
    assert_eq!(snapshot.rows[1][0], Value::Double(2.0));
}

#[test]
fn tag_into_non_symbol_column_skips_line() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    // `host` is created as a DOUBLE field; the next line uses it as a tag.
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "host"), (FieldValue, "1.0")],
    );
    feed_line(
        &mut parser,
        &mut pool,
        &[
            (Measurement, "cpu"),
            (TagName, "host"),
            (TagValue, "A"),
            (FieldName, "load"),
            (FieldValue, "0.5"),
        ],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 1);
    // The skipped line's schema extension never happened either.
    assert!(snapshot.columns.iter().all(|c| c.name != "load"));
}

#[test]
fn bad_timestamp_drops_the_row_only() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    feed_line(
        &mut parser,
        &mut pool,
        &[
            (Measurement, "cpu"),
            (FieldName, "load"),
            (FieldValue, "0.5"),
            (Timestamp, "notanumber"),
        ],
    );
    parser.commit_all().expect("commit");

    // The table was still created; only the row was dropped.
    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert!(snapshot.rows.is_empty());

    feed_line(
        &mut parser,
        &mut pool,
        &[
            (Measurement, "cpu"),
            (FieldName, "load"),
            (FieldValue, "1.5"),
            (Timestamp, "1700000000000000"),
        ],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0][1], Value::Timestamp(1_700_000_000_000_000));
}

#[test]
fn improperly_quoted_string_skips_line() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "log"), (FieldName, "msg"), (FieldValue, "hello\"")],
    );
    feed_line(
        &mut parser,
        &mut pool,
        &[
            (Measurement, "log"),
            (FieldName, "msg"),
            (FieldValue, "\"hello\""),
        ],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("log").expect("log exists");
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0][0], Value::Str("hello".to_string()));
}

#[test]
fn cast_failure_cancels_the_row() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "count"), (FieldValue, "3i")],
    );
    // Ends in `i` so it binds as LONG, but the digits do not parse.
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "count"), (FieldValue, "9x9i")],
    );
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "count"), (FieldValue, "5i")],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.rows[0][0], Value::Long(3));
    assert_eq!(snapshot.rows[1][0], Value::Long(5));
}

#[test]
fn unusable_name_is_poisoned_for_the_process() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    engine.set_status_override("cpu", TableStatus::ReservedName);

    for _ in 0..3 {
        feed_line(
            &mut parser,
            &mut pool,
            &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "0.5")],
        );
    }
    parser.commit_all().expect("commit");

    assert!(engine.snapshot("cpu").is_none());

    // Clearing the status does not help: the entry state is terminal.
    engine.set_status_override("cpu", TableStatus::DoesNotExist);
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "0.5")],
    );
    parser.commit_all().expect("commit");
    assert!(engine.snapshot("cpu").is_none());
}

#[test]
fn busy_writer_skips_the_line_and_recovers() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    create_table(&engine, "cpu", &[("load", ColumnType::Double)]);
    let lease = engine
        .writer(&strata_storage::AllowAllSecurityContext, "cpu")
        .expect("external lease");

    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "0.5")],
    );
    parser.commit_all().expect("commit");
    assert!(engine.snapshot("cpu").expect("cpu exists").rows.is_empty());

    drop(lease);
    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "1.5")],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0][0], Value::Double(1.5));
}

#[test]
fn tokenizer_error_abandons_only_the_current_line() {
    let (engine, mut parser) = create_parser();
    let mut pool = TokenPool::default();

    // A line that never completes: the tokenizer reports an error instead
    // of a line end.
    let measurement = pool.intern("cpu");
    let name = pool.intern("load");
    let value = pool.intern("0.5");
    parser.on_event(
        strata_ingest::LineEvent::Measurement,
        pool.token(measurement),
        &pool,
    );
    parser.on_event(strata_ingest::LineEvent::FieldName, pool.token(name), &pool);
    parser.on_event(strata_ingest::LineEvent::FieldValue, pool.token(value), &pool);
    parser.on_error(17, 2, 9);

    feed_line(
        &mut parser,
        &mut pool,
        &[(Measurement, "cpu"), (FieldName, "load"), (FieldValue, "1.5")],
    );
    parser.commit_all().expect("commit");

    let snapshot = engine.snapshot("cpu").expect("cpu exists");
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0][0], Value::Double(1.5));
    assert_eq!(snapshot.rows[0][1], Value::Timestamp(WALL_CLOCK_MICROS));
}

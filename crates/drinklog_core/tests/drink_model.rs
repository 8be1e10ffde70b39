use drinklog_core::{DrinkColumn, DrinkRecord, DrinkValidationError, DrinkValues};

#[test]
fn record_serializes_under_storage_column_names() {
    let record = DrinkRecord {
        id: 7,
        kind: Some("water".to_string()),
        millilitres: 250,
        recorded_at: "2024-05-01 08:30:00".to_string(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["_id"], 7);
    assert_eq!(json["type"], "water");
    assert_eq!(json["millilitres"], 250);
    assert_eq!(json["datetime"], "2024-05-01 08:30:00");
}

#[test]
fn record_deserializes_null_kind() {
    let record: DrinkRecord = serde_json::from_str(
        r#"{"_id": 3, "type": null, "millilitres": 500, "datetime": "2024-05-01 09:00:00"}"#,
    )
    .unwrap();

    assert_eq!(record.id, 3);
    assert_eq!(record.kind, None);
    assert_eq!(record.millilitres, 500);
}

#[test]
fn values_distinguish_absent_cleared_and_set_kind() {
    let absent = DrinkValues::new();
    assert_eq!(absent.kind(), None);
    assert!(!absent.contains(DrinkColumn::Kind));

    let cleared = DrinkValues::new().with_null_kind();
    assert_eq!(cleared.kind(), Some(None));
    assert!(cleared.contains(DrinkColumn::Kind));

    let set = DrinkValues::new().with_kind("coffee");
    assert_eq!(set.kind(), Some(Some("coffee")));
}

#[test]
fn values_entries_follow_contract_column_order() {
    let values = DrinkValues::new()
        .with_recorded_at("2024-05-01 10:00:00")
        .with_millilitres(330)
        .with_kind("juice");

    let columns: Vec<DrinkColumn> = values.entries().map(|(column, _)| column).collect();
    assert_eq!(
        columns,
        [
            DrinkColumn::Kind,
            DrinkColumn::Millilitres,
            DrinkColumn::RecordedAt
        ]
    );
}

#[test]
fn insert_validation_requires_positive_millilitres() {
    let missing = DrinkValues::new().with_kind("tea");
    assert_eq!(
        missing.validate_for_insert(),
        Err(DrinkValidationError::MissingMillilitres)
    );

    let zero = DrinkValues::new().with_millilitres(0);
    assert_eq!(
        zero.validate_for_insert(),
        Err(DrinkValidationError::NonPositiveMillilitres(0))
    );

    let negative = DrinkValues::new().with_millilitres(-50);
    assert_eq!(
        negative.validate_for_insert(),
        Err(DrinkValidationError::NonPositiveMillilitres(-50))
    );

    let valid = DrinkValues::new().with_millilitres(1);
    assert_eq!(valid.validate_for_insert(), Ok(()));
}

#[test]
fn update_validation_only_checks_carried_fields() {
    let kind_only = DrinkValues::new().with_kind("smoothie");
    assert_eq!(kind_only.validate_for_update(), Ok(()));

    let empty = DrinkValues::new();
    assert_eq!(empty.validate_for_update(), Ok(()));

    let bad_volume = DrinkValues::new().with_millilitres(-1);
    assert_eq!(
        bad_volume.validate_for_update(),
        Err(DrinkValidationError::NonPositiveMillilitres(-1))
    );
}

#[test]
fn kind_is_free_form_and_never_validated() {
    let odd_kind = DrinkValues::new()
        .with_kind("   definitely not a known drink \u{1F375}   ")
        .with_millilitres(10);
    assert_eq!(odd_kind.validate_for_insert(), Ok(()));

    let empty_kind = DrinkValues::new().with_kind("").with_millilitres(10);
    assert_eq!(empty_kind.validate_for_insert(), Ok(()));
}

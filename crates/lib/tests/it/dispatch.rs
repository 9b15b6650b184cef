//! End-to-end tests of the command protocol.

use coffer::backend::InMemory;
use coffer::dispatch::CommandError;
use coffer::{Config, Dispatcher, Doc, Ledger, Value};

use crate::helpers::{CALLER, CountingBackend, call, dispatcher_with, test_config, test_dispatcher};

fn id(player: &str) -> Value {
    Value::from(player)
}

// ===== READS =====

#[tokio::test]
async fn get_on_fresh_player_returns_default_record() {
    let dispatcher = dispatcher_with(Config {
        base_currency: 100.0,
        ..test_config()
    });

    let reply = call(&dispatcher, "get", &[id("fresh")]).await;
    assert_eq!(reply, Ok(Value::Doc(Doc::new().with("currency", 100.0))));
}

#[tokio::test]
async fn currency_returns_formatted_balance() {
    let dispatcher = test_dispatcher();
    let reply = call(&dispatcher, "currency", &[id("fresh")]).await;
    assert_eq!(reply, Ok(Value::Text("$0.00".to_string())));
}

#[tokio::test]
async fn get_path_returns_value_or_null() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.stats.wins", &[id("u1"), Value::from(3.0)]).await.unwrap();

    let reply = call(&dispatcher, "get.stats.wins", &[id("u1")]).await;
    assert_eq!(reply, Ok(Value::Number(3.0)));

    // Missing paths read back as null, and reading must not vivify
    let reply = call(&dispatcher, "get.stats.losses", &[id("u1")]).await;
    assert_eq!(reply, Ok(Value::Null));
    let record = call(&dispatcher, "get.stats", &[id("u1")]).await.unwrap();
    assert_eq!(record, Value::Doc(Doc::new().with("wins", 3.0)));
}

// ===== UPDATE / SET =====

#[tokio::test]
async fn update_merges_shallowly() {
    let dispatcher = test_dispatcher();
    let partial = Doc::new().with("currency", 500.0).with("name", "hello");

    let reply = call(&dispatcher, "update", &[id("u1"), Value::Doc(partial)]).await;
    assert_eq!(reply, Ok(Value::Null));

    assert_eq!(
        call(&dispatcher, "get.name", &[id("u1")]).await,
        Ok(Value::Text("hello".to_string()))
    );
    assert_eq!(
        call(&dispatcher, "get.currency", &[id("u1")]).await,
        Ok(Value::Number(500.0))
    );
}

#[tokio::test]
async fn update_rejects_non_map_operand() {
    let dispatcher = test_dispatcher();
    let reply = call(&dispatcher, "update", &[id("u1"), Value::from(5.0)]).await;
    assert_eq!(reply, Err(CommandError::UpdateOperandNotMap));
}

#[tokio::test]
async fn set_deep_path_vivifies_intermediates() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.a.b.c", &[id("u1"), Value::from(5.0)]).await.unwrap();

    assert_eq!(
        call(&dispatcher, "get.a.b.c", &[id("u1")]).await,
        Ok(Value::Number(5.0))
    );
}

#[tokio::test]
async fn set_through_scalar_replaces_it_with_a_mapping() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.name", &[id("u1"), Value::from("bob")]).await.unwrap();
    call(&dispatcher, "set.name.first", &[id("u1"), Value::from("b")]).await.unwrap();

    assert_eq!(
        call(&dispatcher, "get.name.first", &[id("u1")]).await,
        Ok(Value::Text("b".to_string()))
    );
}

// ===== ADD =====

#[tokio::test]
async fn add_currency_twice_accumulates() {
    let dispatcher = test_dispatcher();

    let first = call(&dispatcher, "add.currency", &[id("u1"), Value::from(10.0)]).await;
    assert_eq!(first, Ok(Value::Number(10.0)));

    let second = call(&dispatcher, "add.currency", &[id("u1"), Value::from(10.0)]).await;
    assert_eq!(second, Ok(Value::Number(20.0)));

    assert_eq!(
        call(&dispatcher, "get.currency", &[id("u1")]).await,
        Ok(Value::Number(20.0))
    );
}

#[tokio::test]
async fn add_requires_numeric_operand() {
    let dispatcher = test_dispatcher();
    let reply = call(&dispatcher, "add.currency", &[id("u1"), Value::from("ten")]).await;
    assert_eq!(reply, Err(CommandError::AddOperandNotNumber));
    assert_eq!(
        reply.unwrap_err().to_string(),
        "Must add a number to a number field"
    );
}

#[tokio::test]
async fn add_to_non_number_field_errors_without_mutating() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.name", &[id("u1"), Value::from("bob")]).await.unwrap();

    let reply = call(&dispatcher, "add.name", &[id("u1"), Value::from(5.0)]).await;
    assert_eq!(reply, Err(CommandError::AddTargetNotNumber));
    assert_eq!(
        reply.unwrap_err().to_string(),
        "Cannot add to a field that is not a number"
    );

    // The field survived untouched
    assert_eq!(
        call(&dispatcher, "get.name", &[id("u1")]).await,
        Ok(Value::Text("bob".to_string()))
    );
}

// ===== PUSH =====

#[tokio::test]
async fn push_creates_then_appends() {
    let dispatcher = test_dispatcher();

    let first = call(&dispatcher, "push.items", &[id("u1"), Value::from("sword")]).await;
    assert_eq!(first, Ok(Value::List(vec![Value::from("sword")])));

    let second = call(&dispatcher, "push.items", &[id("u1"), Value::from("shield")]).await;
    assert_eq!(
        second,
        Ok(Value::List(vec![Value::from("sword"), Value::from("shield")]))
    );
}

#[tokio::test]
async fn push_to_non_list_keeps_legacy_error_text() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.name", &[id("u1"), Value::from("bob")]).await.unwrap();

    let reply = call(&dispatcher, "push.name", &[id("u1"), Value::from("x")]).await;
    assert_eq!(reply, Err(CommandError::PushTargetNotList));
    // The wire message is shared with the add family; callers match on it
    assert_eq!(
        reply.unwrap_err().to_string(),
        "Cannot add to a field that is not a number"
    );
}

// ===== DELETE =====

#[tokio::test]
async fn delete_base_field_is_protected() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "add.currency", &[id("u1"), Value::from(5.0)]).await.unwrap();

    let reply = call(&dispatcher, "delete.currency", &[id("u1")]).await;
    assert_eq!(reply, Err(CommandError::DeleteBaseField));

    // Record unchanged
    assert_eq!(
        call(&dispatcher, "get.currency", &[id("u1")]).await,
        Ok(Value::Number(5.0))
    );
}

#[tokio::test]
async fn delete_non_base_field_returns_captured_value() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "push.items", &[id("u1"), Value::from("sword")]).await.unwrap();

    let reply = call(&dispatcher, "delete.items", &[id("u1")]).await;
    assert_eq!(reply, Ok(Value::List(vec![Value::from("sword")])));
    assert_eq!(call(&dispatcher, "get.items", &[id("u1")]).await, Ok(Value::Null));
}

#[tokio::test]
async fn delete_missing_field_is_a_noop_returning_null() {
    let dispatcher = test_dispatcher();
    let reply = call(&dispatcher, "delete.ghost", &[id("u1")]).await;
    assert_eq!(reply, Ok(Value::Null));
}

#[tokio::test]
async fn delete_nested_currency_is_not_base_protected() {
    let dispatcher = test_dispatcher();
    call(&dispatcher, "set.wallet.currency", &[id("u1"), Value::from(1.0)]).await.unwrap();

    let reply = call(&dispatcher, "delete.wallet.currency", &[id("u1")]).await;
    assert_eq!(reply, Ok(Value::Number(1.0)));
}

// ===== FORMAT / ROUND / UNKNOWN =====

#[tokio::test]
async fn format_and_round_validate_operands() {
    let dispatcher = test_dispatcher();

    assert_eq!(
        call(&dispatcher, "format", &[Value::from(19.999)]).await,
        Ok(Value::Text("$20.00".to_string()))
    );
    assert_eq!(
        call(&dispatcher, "round", &[Value::from(19.999)]).await,
        Ok(Value::Number(20.0))
    );

    let reply = call(&dispatcher, "format", &[Value::from("x")]).await;
    assert_eq!(
        reply.unwrap_err().to_string(),
        "Argument to `format` must be a number"
    );
    let reply = call(&dispatcher, "round", &[]).await;
    assert_eq!(
        reply.unwrap_err().to_string(),
        "Argument to `round` must be a number"
    );
}

#[tokio::test]
async fn unknown_event_errors_without_store_io() {
    let backend = CountingBackend::new();
    let (gets, sets) = backend.counters();
    let dispatcher = Dispatcher::new(Ledger::new(test_config(), backend));

    let reply = call(&dispatcher, "steal.currency", &[id("u1")]).await;
    assert_eq!(
        reply,
        Err(CommandError::UnknownEvent("steal.currency".to_string()))
    );
    assert_eq!(reply.unwrap_err().to_string(), "Invalid event steal.currency");

    // format and round are pure as well
    call(&dispatcher, "format", &[Value::from(1.0)]).await.unwrap();
    call(&dispatcher, "round", &[Value::from(1.0)]).await.unwrap();

    assert_eq!(gets.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(sets.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_player_id_is_a_validation_error() {
    let dispatcher = test_dispatcher();
    let reply = call(&dispatcher, "get", &[]).await;
    assert_eq!(reply, Err(CommandError::MissingPlayerId));

    let reply = call(&dispatcher, "get", &[Value::from(42.0)]).await;
    assert_eq!(reply, Err(CommandError::MissingPlayerId));
}

// ===== REFERENCE SCENARIO =====

#[tokio::test]
async fn reference_scenario_rounding_on_add() {
    // Config {decimal_places: 2, prefix: "$", base_currency: 0}
    let dispatcher = test_dispatcher();

    let reply = call(&dispatcher, "add.currency", &[id("u1"), Value::from(19.999)]).await;
    assert_eq!(reply, Ok(Value::Number(20.0)));

    assert_eq!(
        call(&dispatcher, "currency", &[id("u1")]).await,
        Ok(Value::Text("$20.00".to_string()))
    );
    assert_eq!(
        call(&dispatcher, "get.currency", &[id("u1")]).await,
        Ok(Value::Number(20.0))
    );
}

// ===== OBSERVABILITY / BOUNDARY =====

#[tokio::test]
async fn dependents_are_tracked_once_per_caller() {
    let dispatcher = test_dispatcher();

    dispatcher.handle("get", CALLER, &[id("u1")]).await.unwrap();
    dispatcher.handle("get", CALLER, &[id("u1")]).await.unwrap();
    assert_eq!(dispatcher.dependent_count(), 1);

    dispatcher.handle("get", "other-plugin", &[id("u1")]).await.unwrap();
    assert_eq!(dispatcher.dependent_count(), 2);
}

#[tokio::test]
async fn reply_json_renders_values_and_errors() {
    let dispatcher = test_dispatcher();

    let reply = call(&dispatcher, "currency", &[id("u1")]).await;
    assert_eq!(
        Dispatcher::<InMemory>::reply_json(&reply),
        serde_json::json!("$0.00")
    );

    let reply = call(&dispatcher, "delete.currency", &[id("u1")]).await;
    assert_eq!(
        Dispatcher::<InMemory>::reply_json(&reply),
        serde_json::json!({ "error": "Cannot delete a base field" })
    );
}

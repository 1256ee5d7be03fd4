use super::*;
use crate::store::InMemoryStore;

fn nov(day: u32) -> CalendarDay {
    CalendarDay::from_ymd(2024, 11, day).expect("day")
}

fn filled_form() -> FormController {
    let mut form = FormController::new(CalendarMonth::default());
    form.update_field(Field::FirstName("Ana".into()));
    form.update_field(Field::LastName("Silva".into()));
    form.update_field(Field::Contract(ContractType::Freelancer));
    form.update_field(Field::Position(Position::Lifeguard));
    assert!(form.toggle_date(nov(12)));
    assert!(form.toggle_date(nov(5)));
    form
}

#[test]
fn starts_with_the_initial_values() {
    let form = FormController::new(CalendarMonth::default());
    let snapshot = form.snapshot();
    assert_eq!(snapshot.fields.first_name, "");
    assert_eq!(snapshot.fields.last_name, "");
    assert_eq!(snapshot.fields.contract, ContractType::Intermittent);
    assert_eq!(snapshot.fields.position, Position::Monitor);
    assert!(snapshot.fields.selected_dates.is_empty());
    assert!(snapshot.last_error.is_none());
}

#[test]
fn toggling_twice_restores_the_selection() {
    let mut form = FormController::new(CalendarMonth::default());
    form.toggle_date(nov(3));
    let before = form.fields().selected_dates.clone();

    form.toggle_date(nov(20));
    assert!(form.is_selected(&nov(20)));
    form.toggle_date(nov(20));
    assert_eq!(form.fields().selected_dates, before);
}

#[test]
fn toggle_outside_month_is_ignored() {
    let mut form = FormController::new(CalendarMonth::default());
    let december = CalendarDay::from_ymd(2024, 12, 1).expect("day");
    assert!(!form.toggle_date(december));
    assert!(form.fields().selected_dates.is_empty());
}

#[test]
fn calendar_marks_selected_days_only() {
    let mut form = FormController::new(CalendarMonth::default());
    form.toggle_date(nov(1));

    let cells = form.calendar(None);
    assert_eq!(cells.len(), 35);
    assert!(cells[..5].iter().all(|(cell, selected)| {
        *cell == CalendarCell::Placeholder && !selected
    }));
    assert!(cells[5].1);
    assert_eq!(cells.iter().filter(|(_, selected)| *selected).count(), 1);
}

#[tokio::test]
async fn valid_submit_calls_create_once_and_clears_the_form() {
    let store = InMemoryStore::new();
    let mut form = filled_form();

    let created = form.submit(&store).await.expect("submit");

    assert_eq!(store.create_calls(), 1);
    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.first_name, "Ana");
    assert_eq!(created.last_name, "Silva");
    assert_eq!(created.contract, ContractType::Freelancer);
    assert_eq!(created.position, Position::Lifeguard);
    assert_eq!(
        created.dates.iter().copied().collect::<Vec<_>>(),
        vec![nov(5), nov(12)]
    );
    assert_eq!(form.fields(), &FormFields::default());
    assert!(form.last_error().is_none());
}

#[tokio::test]
async fn missing_last_name_never_reaches_the_store() {
    let store = InMemoryStore::new();
    let mut form = filled_form();
    form.update_field(Field::LastName(String::new()));

    let err = form.submit(&store).await.expect_err("must fail");

    assert_eq!(err, FormError::MissingName);
    assert_eq!(form.last_error(), Some(&FormError::MissingName));
    assert_eq!(store.create_calls(), 0);
    assert_eq!(form.fields().first_name, "Ana");
}

#[tokio::test]
async fn empty_first_name_is_missing_name() {
    let store = InMemoryStore::new();
    let mut form = FormController::new(CalendarMonth::default());
    form.update_field(Field::FirstName(String::new()));
    form.update_field(Field::LastName("Silva".into()));
    form.toggle_date(nov(5));

    let err = form.submit(&store).await.expect_err("must fail");

    assert_eq!(err, FormError::MissingName);
    assert_eq!(err.user_message(), "Nome e sobrenome são obrigatórios.");
    assert_eq!(form.last_error(), Some(&FormError::MissingName));
    assert_eq!(store.create_calls(), 0);
    assert_eq!(form.fields().last_name, "Silva");
    assert!(form.is_selected(&nov(5)));
}

#[tokio::test]
async fn whitespace_only_name_counts_as_missing() {
    let store = InMemoryStore::new();
    let mut form = filled_form();
    form.update_field(Field::FirstName("   ".into()));

    let err = form.submit(&store).await.expect_err("must fail");
    assert_eq!(err, FormError::MissingName);
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn empty_selection_is_rejected_locally() {
    let store = InMemoryStore::new();
    let mut form = FormController::new(CalendarMonth::default());
    form.update_field(Field::FirstName("Ana".into()));
    form.update_field(Field::LastName("Silva".into()));

    let err = form.submit(&store).await.expect_err("must fail");

    assert_eq!(err, FormError::NoDatesSelected);
    assert_eq!(
        err.user_message(),
        "Selecione ao menos uma data de disponibilidade."
    );
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn names_are_trimmed_before_sending() {
    let store = InMemoryStore::new();
    let mut form = filled_form();
    form.update_field(Field::FirstName("  Ana ".into()));

    let created = form.submit(&store).await.expect("submit");
    assert_eq!(created.first_name, "Ana");
}

#[tokio::test]
async fn store_failure_keeps_entered_values() {
    let store = InMemoryStore::new();
    store.set_available(false);
    let mut form = filled_form();
    let before = form.fields().clone();

    let err = form.submit(&store).await.expect_err("must fail");

    assert!(matches!(err, FormError::StoreUnavailable(_)));
    assert_eq!(form.fields(), &before);
    assert_eq!(form.last_error(), Some(&err));
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn successful_retry_clears_the_previous_error() {
    let store = InMemoryStore::new();
    store.set_available(false);
    let mut form = filled_form();
    form.submit(&store).await.expect_err("offline");

    store.set_available(true);
    form.submit(&store).await.expect("retry");
    assert!(form.last_error().is_none());
    assert_eq!(store.create_calls(), 2);
}

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};

use crate::{
    day_service::DayService, debt_service::DebtService, rates::StaticRateTable,
    settings_service::SettingsService, storage::state_warnings,
    suggestion_service::SuggestionService, summary_service::SummaryService,
    transaction_service::TransactionService, ui_service::UiService, CoreError,
};
use daybook_domain::{
    AppState, DayStatus, DebtKind, DebtPatch, NewDebt, NewTransaction, PaymentMethod,
    SettingsPatch, TransactionKind, TransactionPatch,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
}

fn started(today: NaiveDate, cash: f64) -> AppState {
    DayService::start_day(&AppState::initial(), today, at(today, 8), cash)
        .expect("valid opening cash")
        .expect("first start")
}

fn add(state: &AppState, today: NaiveDate, hour: u32, entry: NewTransaction) -> (AppState, uuid::Uuid) {
    TransactionService::add(state, today, at(today, hour), entry).expect("add transaction")
}

#[test]
fn day_lifecycle_freezes_profit_and_closing_cash() {
    let today = day(2025, 3, 4);
    let state = started(today, 100.0);
    let (state, _) = add(&state, today, 9, NewTransaction::income(50.0, PaymentMethod::Cash, "Coffee"));
    let (state, _) = add(&state, today, 10, NewTransaction::expense(20.0, PaymentMethod::Card, "Milk"));
    let (state, _) = add(&state, today, 11, NewTransaction::expense(5.0, PaymentMethod::Cash, "Tips"));

    let closed = DayService::end_day(&state, today).expect("open log");
    let log = closed.log(today).unwrap();
    assert_eq!(log.status, DayStatus::Closed);
    assert_eq!(log.total_income, 50.0);
    assert_eq!(log.total_expenses, 25.0);
    assert_eq!(log.cash_income, 50.0);
    assert_eq!(log.cash_expenses, 5.0);
    assert_eq!(log.profit, Some(25.0));
    assert_eq!(log.closing_cash, Some(145.0));
    assert!(DayService::todays_log(&closed, today).is_none());
}

#[test]
fn start_day_is_idempotent_per_date() {
    let today = day(2025, 3, 4);
    let state = started(today, 10.0);
    let again = DayService::start_day(&state, today, at(today, 12), 999.0).unwrap();
    assert!(again.is_none());

    let closed = DayService::end_day(&state, today).unwrap();
    let reopened = DayService::start_day(&closed, today, at(today, 13), 5.0).unwrap();
    assert!(reopened.is_none(), "a closed day cannot be restarted");
}

#[test]
fn start_day_rejects_negative_cash() {
    let today = day(2025, 3, 4);
    let err = DayService::start_day(&AppState::initial(), today, at(today, 8), -1.0).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn end_day_without_open_log_is_noop() {
    let today = day(2025, 3, 4);
    assert!(DayService::end_day(&AppState::initial(), today).is_none());

    let yesterday = today - Duration::days(1);
    let state = started(yesterday, 10.0);
    assert!(DayService::end_day(&state, today).is_none());
}

#[test]
fn add_requires_open_day_and_leaves_state_untouched() {
    let today = day(2025, 3, 4);
    let state = AppState::initial();
    let err = TransactionService::add(
        &state,
        today,
        at(today, 9),
        NewTransaction::income(10.0, PaymentMethod::Cash, "x"),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::NoActiveDay));
    assert!(state.transactions.is_empty());

    let closed = DayService::end_day(&started(today, 0.0), today).unwrap();
    let err = TransactionService::add(
        &closed,
        today,
        at(today, 9),
        NewTransaction::income(10.0, PaymentMethod::Cash, "x"),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::NoActiveDay));
}

#[test]
fn add_rejects_non_positive_amounts() {
    let today = day(2025, 3, 4);
    let state = started(today, 0.0);
    for amount in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        let result = TransactionService::add(
            &state,
            today,
            at(today, 9),
            NewTransaction::income(amount, PaymentMethod::Cash, "bad"),
        );
        assert!(matches!(result, Err(CoreError::Validation(_))), "amount {amount}");
    }
}

#[test]
fn update_moves_contribution_between_buckets() {
    let today = day(2025, 3, 4);
    let state = started(today, 0.0);
    let (state, id) = add(&state, today, 9, NewTransaction::income(40.0, PaymentMethod::Cash, "Sale"));

    let patch = TransactionPatch {
        kind: Some(TransactionKind::Expense),
        amount: Some(15.0),
        payment_method: Some(PaymentMethod::Transfer),
        description: None,
    };
    let next = TransactionService::update(&state, id, &patch).unwrap().unwrap();
    let log = next.log(today).unwrap();
    assert_eq!(log.total_income, 0.0);
    assert_eq!(log.cash_income, 0.0);
    assert_eq!(log.total_expenses, 15.0);
    assert_eq!(log.cash_expenses, 0.0);

    let txn = next.transaction(id).unwrap();
    assert_eq!(txn.description, "Sale");
    assert_eq!(txn.timestamp, at(today, 9));
    assert_eq!(
        TransactionService::recompute_totals(&next, log).total_expenses,
        log.total_expenses
    );
}

#[test]
fn update_of_unknown_transaction_is_noop() {
    let today = day(2025, 3, 4);
    let state = started(today, 0.0);
    let patch = TransactionPatch {
        amount: Some(9.0),
        ..TransactionPatch::default()
    };
    assert!(TransactionService::update(&state, uuid::Uuid::new_v4(), &patch)
        .unwrap()
        .is_none());
}

#[test]
fn update_on_closed_day_keeps_frozen_figures() {
    let today = day(2025, 3, 4);
    let state = started(today, 10.0);
    let (state, id) = add(&state, today, 9, NewTransaction::income(30.0, PaymentMethod::Cash, "Sale"));
    let closed = DayService::end_day(&state, today).unwrap();

    let patch = TransactionPatch {
        amount: Some(50.0),
        ..TransactionPatch::default()
    };
    let next = TransactionService::update(&closed, id, &patch).unwrap().unwrap();
    let log = next.log(today).unwrap();
    assert_eq!(log.total_income, 50.0);
    assert_eq!(log.cash_income, 50.0);
    assert_eq!(log.profit, Some(30.0));
    assert_eq!(log.closing_cash, Some(40.0));
}

#[test]
fn delete_reverts_contribution_and_ownership() {
    let today = day(2025, 3, 4);
    let state = started(today, 0.0);
    let (state, keep) = add(&state, today, 9, NewTransaction::income(12.5, PaymentMethod::Card, "A"));
    let (state, drop) = add(&state, today, 10, NewTransaction::expense(2.5, PaymentMethod::Cash, "B"));

    let next = TransactionService::delete(&state, drop).expect("known id");
    let log = next.log(today).unwrap();
    assert_eq!(log.transaction_ids, vec![keep]);
    assert_eq!(log.total_expenses, 0.0);
    assert_eq!(log.cash_expenses, 0.0);
    assert_eq!(log.total_income, 12.5);
    assert!(next.transaction(drop).is_none());

    assert!(TransactionService::delete(&next, drop).is_none());
}

#[test]
fn for_log_lists_newest_first() {
    let today = day(2025, 3, 4);
    let state = started(today, 0.0);
    let (state, first) = add(&state, today, 9, NewTransaction::income(1.0, PaymentMethod::Cash, "first"));
    let (state, second) = add(&state, today, 11, NewTransaction::income(1.0, PaymentMethod::Cash, "second"));
    let listed: Vec<_> = TransactionService::for_log(&state, state.log(today).unwrap())
        .iter()
        .map(|txn| txn.id)
        .collect();
    assert_eq!(listed, vec![second, first]);
}

#[test]
fn services_never_mutate_their_input() {
    let today = day(2025, 3, 4);
    let state = started(today, 5.0);
    let before = state.clone();
    let (_next, _) = add(&state, today, 9, NewTransaction::income(3.0, PaymentMethod::Cash, "x"));
    let _ = DayService::end_day(&state, today);
    let _ = SettingsService::update(&state, &StaticRateTable::new(), &SettingsPatch::currency("EUR"));
    assert_eq!(state, before);
}

#[test]
fn currency_change_rescales_every_amount() {
    let today = day(2025, 3, 4);
    let state = started(today, 100.0);
    let (state, txn) = add(&state, today, 9, NewTransaction::income(10.0, PaymentMethod::Cash, "x"));
    let closed = DayService::end_day(&state, today).unwrap();
    let (closed, debt) = DebtService::add(
        &closed,
        at(today, 12),
        NewDebt::new("Sam", 20.0, DebtKind::OwedToMe),
    )
    .unwrap();

    let next = SettingsService::update(&closed, &StaticRateTable::new(), &SettingsPatch::currency("NGN"));
    assert_eq!(next.settings.currency.as_str(), "NGN");
    assert_eq!(next.transaction(txn).unwrap().amount, 14_850.0);
    assert_eq!(next.debt(debt).unwrap().amount, 29_700.0);
    let log = next.log(today).unwrap();
    assert_eq!(log.opening_cash, 148_500.0);
    assert_eq!(log.total_income, 14_850.0);
    assert_eq!(log.cash_income, 14_850.0);
    assert_eq!(log.profit, Some(14_850.0));
    assert_eq!(log.closing_cash, Some(163_350.0));
}

#[test]
fn unknown_currency_changes_code_only() {
    let today = day(2025, 3, 4);
    let state = started(today, 100.0);
    let next = SettingsService::update(&state, &StaticRateTable::new(), &SettingsPatch::currency("XYZ"));
    assert_eq!(next.settings.currency.as_str(), "XYZ");
    assert_eq!(next.log(today).unwrap().opening_cash, 100.0);
}

#[test]
fn profile_patch_does_not_rescale() {
    let today = day(2025, 3, 4);
    let state = started(today, 100.0);
    let next = SettingsService::update(
        &state,
        &StaticRateTable::new(),
        &SettingsPatch::profile("Ada", "Ada's Deli"),
    );
    assert_eq!(next.settings.profile.business_name, "Ada's Deli");
    assert_eq!(next.settings.currency.as_str(), "USD");
    assert_eq!(next.log(today).unwrap().opening_cash, 100.0);
}

#[test]
fn reset_keeps_profile_only() {
    let today = day(2025, 3, 4);
    let state = started(today, 100.0);
    let state = SettingsService::update(&state, &StaticRateTable::new(), &SettingsPatch {
        profile: Some(daybook_domain::Profile {
            name: "Ada".into(),
            business_name: "Deli".into(),
        }),
        currency: Some("EUR".into()),
        onboarding_completed: Some(true),
    });

    let reset = SettingsService::reset(&state);
    assert!(reset.daily_logs.is_empty());
    assert!(reset.transactions.is_empty());
    assert_eq!(reset.settings.profile.name, "Ada");
    assert_eq!(reset.settings.currency.as_str(), "USD");
    assert!(!reset.settings.onboarding_completed);
}

#[test]
fn debt_update_refreshes_timestamp_and_totals_net() {
    let now = at(day(2025, 3, 4), 9);
    let (state, owed) =
        DebtService::add(&AppState::initial(), now, NewDebt::new("Sam", 30.0, DebtKind::OwedToMe)).unwrap();
    let (state, _) = DebtService::add(
        &state,
        now,
        NewDebt::new("Supplier", 12.0, DebtKind::IOwe).with_notes("flour"),
    )
    .unwrap();

    let later = now + Duration::hours(3);
    let next = DebtService::update(&state, later, owed, &DebtPatch::default())
        .unwrap()
        .unwrap();
    assert_eq!(next.debt(owed).unwrap().last_updated, later);

    let totals = DebtService::totals(&next);
    assert_eq!(totals.owed_to_me, 30.0);
    assert_eq!(totals.i_owe, 12.0);
    assert_eq!(totals.net, 18.0);

    assert!(matches!(
        DebtService::add(&next, now, NewDebt::new("Neg", -1.0, DebtKind::IOwe)),
        Err(CoreError::Validation(_))
    ));
    let removed = DebtService::delete(&next, owed).unwrap();
    assert_eq!(removed.debts.len(), 1);
    assert!(DebtService::delete(&removed, owed).is_none());
}

#[test]
fn toggling_sheet_closed_clears_editing_id() {
    let id = uuid::Uuid::new_v4();
    let open = UiService::toggle_transaction_sheet(&AppState::initial(), true, Some(id));
    assert!(open.ui.is_transaction_sheet_open);
    assert_eq!(open.ui.editing_transaction_id, Some(id));

    let closed = UiService::toggle_transaction_sheet(&open, false, Some(id));
    assert!(!closed.ui.is_transaction_sheet_open);
    assert_eq!(closed.ui.editing_transaction_id, None);
}

#[test]
fn weekly_summaries_skip_today_and_sort_newest_first() {
    let mut state = AppState::initial();
    // Wed 2025-02-12 and Mon 2025-02-17 fall in different weeks.
    for (date, amount) in [(day(2025, 2, 12), 10.0), (day(2025, 2, 17), 7.0), (day(2025, 2, 18), 99.0)] {
        state = DayService::start_day(&state, date, at(date, 8), 0.0).unwrap().unwrap();
        state = TransactionService::add(
            &state,
            date,
            at(date, 9),
            NewTransaction::income(amount, PaymentMethod::Cash, "sale"),
        )
        .unwrap()
        .0;
        state = DayService::end_day(&state, date).unwrap_or(state);
    }

    let weeks = SummaryService::weekly_summaries(&state, day(2025, 2, 18));
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_id, "2025-W08");
    assert_eq!(weeks[0].start, day(2025, 2, 17));
    assert_eq!(weeks[0].end, day(2025, 2, 23));
    assert_eq!(weeks[0].total_income, 7.0);
    assert_eq!(weeks[1].week_id, "2025-W07");
    assert_eq!(weeks[1].profit, 10.0);

    let breakdown = SummaryService::weekday_breakdown(&state, day(2025, 2, 19));
    assert_eq!(breakdown[0].weekday, Weekday::Mon);
    assert_eq!(breakdown[0].income, 7.0);
    assert_eq!(breakdown[1].income, 99.0);
    assert_eq!(breakdown[6].weekday, Weekday::Sun);
}

#[test]
fn suggestions_rank_prefix_matches_first() {
    let today = day(2025, 3, 4);
    let mut state = started(today, 0.0);
    for desc in ["Coffee beans", "Coffee beans", "Cofee filters", "Rent", "coffee"] {
        state = add(&state, today, 9, NewTransaction::expense(1.0, PaymentMethod::Cash, desc)).0;
    }

    let hits = SuggestionService::suggest(&state, "coffee", 5);
    assert_eq!(hits[0], "Coffee beans");
    assert!(hits.contains(&"Cofee filters".to_string()));
    assert!(!hits.iter().any(|hit| hit == "Rent" || hit == "coffee"));
    assert_eq!(hits.iter().filter(|hit| *hit == "Coffee beans").count(), 1);

    assert!(SuggestionService::suggest(&state, "co", 5).is_empty());
}

#[test]
fn warnings_flag_orphans_and_duplicate_open_logs() {
    let first = day(2025, 3, 3);
    let second = day(2025, 3, 4);
    let state = started(first, 0.0);
    let mut state = DayService::start_day(&state, second, at(second, 8), 0.0)
        .unwrap()
        .unwrap();
    let ghost = uuid::Uuid::new_v4();
    state.log_mut(first).unwrap().transaction_ids.push(ghost);

    let warnings = state_warnings(&state);
    assert!(warnings.iter().any(|w| w.contains(&ghost.to_string())));
    assert!(warnings.iter().any(|w| w.starts_with("multiple open logs")));
}

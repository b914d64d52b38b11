mod common;

use common::{day, setup_store, TestClock};
use daybook::{
    currency::{currency_name, format_amount},
    daybook_core::{RateProvider, StaticRateTable},
    daybook_domain::{CurrencyCode, DebtKind, NewDebt, NewTransaction, PaymentMethod, SettingsPatch},
};

fn close_to(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn round_trip_through_another_currency_restores_amounts() {
    let clock = TestClock::at(day(2025, 6, 2), 9);
    let (mut store, _dir) = setup_store(clock);
    store.start_day(250.0).unwrap();
    store
        .add_transaction(NewTransaction::income(19.99, PaymentMethod::Cash, "Haircut"))
        .unwrap();
    store
        .add_debt(NewDebt::new("Landlord", 600.0, DebtKind::IOwe))
        .unwrap();

    store.update_settings(&SettingsPatch::currency("NGN"));
    store.update_settings(&SettingsPatch::currency("USD"));

    let state = store.state();
    let log = state.log(day(2025, 6, 2)).unwrap();
    assert!(close_to(log.opening_cash, 250.0));
    assert!(close_to(log.cash_income, 19.99));
    assert!(close_to(state.transactions[0].amount, 19.99));
    assert!(close_to(state.debts[0].amount, 600.0));
}

#[test]
fn unknown_currency_changes_code_only() {
    let clock = TestClock::at(day(2025, 6, 2), 9);
    let (mut store, _dir) = setup_store(clock);
    store.start_day(40.0).unwrap();

    store.update_settings(&SettingsPatch::currency("zzz"));
    let state = store.state();
    assert_eq!(state.settings.currency.as_str(), "ZZZ");
    assert_eq!(state.log(day(2025, 6, 2)).unwrap().opening_cash, 40.0);
    assert_eq!(
        format_amount(40.0, &state.settings.currency),
        "ZZZ 40.00"
    );
}

#[test]
fn detour_through_unknown_currency_keeps_the_old_values() {
    let clock = TestClock::at(day(2025, 6, 2), 9);
    let (mut store, _dir) = setup_store(clock);
    store.start_day(100.0).unwrap();
    store
        .add_transaction(NewTransaction::expense(50.0, PaymentMethod::Card, "Stock"))
        .unwrap();

    store.update_settings(&SettingsPatch::currency("EUR"));
    // Neither leg touching ZZZ has a rate, so the EUR figures are relabelled.
    store.update_settings(&SettingsPatch::currency("ZZZ"));
    store.update_settings(&SettingsPatch::currency("USD"));

    let state = store.state();
    assert_eq!(state.settings.currency.as_str(), "USD");
    let log = state.log(day(2025, 6, 2)).unwrap();
    assert!(close_to(log.opening_cash, 92.0));
    assert!(close_to(log.total_expenses, 46.0));
    assert!(close_to(state.transactions[0].amount, 46.0));
}

#[test]
fn cross_rates_go_through_the_dollar() {
    let table = StaticRateTable::from_rates([("USD", 1.0), ("EUR", 0.5), ("GBP", 0.25)]);
    let eur = CurrencyCode::new("EUR");
    let gbp = CurrencyCode::new("GBP");
    assert!(close_to(table.rate(&eur, &gbp), 0.5));
    assert!(close_to(table.rate(&gbp, &eur), 2.0));
    assert_eq!(table.rate(&eur, &CurrencyCode::new("XYZ")), 1.0);
}

#[test]
fn every_supported_code_has_a_display_name() {
    for code in StaticRateTable::new().supported_codes() {
        assert!(currency_name(code.as_str()).is_some(), "{code}");
    }
}

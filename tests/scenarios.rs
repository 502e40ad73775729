use approx::assert_abs_diff_eq;
use mortgage_engine::{
    calculate, load_loans_from_reader, BankProfile, Currency, GraceKind, LoanTerms, LoanTermsPatch,
    MortgageCalculator, MortgageError, RateKind, ScenarioRunner,
};

fn scenario_terms() -> LoanTerms {
    LoanTerms::new(200_000.0, 20_000.0, 180_000.0, 0.10, RateKind::Effective, 180)
}

#[test]
fn effective_rate_fifteen_year_loan() {
    let result = calculate(&scenario_terms()).unwrap();

    assert_abs_diff_eq!(result.periodic_rate(), 0.007974140428903764, epsilon = 1e-12);
    assert_abs_diff_eq!(result.fixed_installment(), 1887.10, epsilon = 0.01);
    assert_eq!(result.items().len(), 180);
    assert_abs_diff_eq!(
        result.total_interest_paid() + result.principal_financed(),
        result.total_paid_base(),
        epsilon = 0.05
    );
}

#[test]
fn percentage_rate_is_read_as_decimal() {
    let mut terms = scenario_terms();
    terms.annual_interest_rate = 10.0;
    let percent = calculate(&terms).unwrap();
    let decimal = calculate(&scenario_terms()).unwrap();

    assert_eq!(percent.periodic_rate(), decimal.periodic_rate());
    assert_eq!(percent.fixed_installment(), decimal.fixed_installment());
}

#[test]
fn nominal_rate_fifteen_year_loan() {
    let mut terms = scenario_terms();
    terms.rate_kind = RateKind::Nominal;
    let result = calculate(&terms).unwrap();

    assert_abs_diff_eq!(result.periodic_rate(), 0.10 / 12.0, epsilon = 1e-15);
    assert_abs_diff_eq!(result.fixed_installment(), 1934.29, epsilon = 0.01);
}

#[test]
fn total_grace_raises_installment() {
    let plain = calculate(&scenario_terms()).unwrap();
    let grace = calculate(&scenario_terms().with_grace(6, GraceKind::Total)).unwrap();

    assert!(grace.adjusted_principal() > grace.principal_financed());
    assert_abs_diff_eq!(grace.adjusted_principal(), 188_785.59, epsilon = 0.01);
    assert!(grace.fixed_installment() > plain.fixed_installment());
    assert_abs_diff_eq!(grace.fixed_installment(), 2010.09, epsilon = 0.01);

    let grace_rows = grace.items().iter().filter(|item| item.is_grace_period).count();
    assert_eq!(grace_rows, 6);
    assert!(grace.items()[..6].iter().all(|item| item.base_installment == 0.0));
}

#[test]
fn partial_grace_pays_interest_first() {
    let result = calculate(&scenario_terms().with_grace(6, GraceKind::Partial)).unwrap();

    assert_eq!(result.adjusted_principal(), result.principal_financed());
    for item in &result.items()[..6] {
        assert_abs_diff_eq!(item.base_installment, 180_000.0 * result.periodic_rate(), epsilon = 1e-9);
        assert_eq!(item.remaining_balance, 180_000.0);
    }
}

#[test]
fn grace_kind_none_ignores_grace_count() {
    let plain = calculate(&scenario_terms()).unwrap();
    let ignored = calculate(&scenario_terms().with_grace(6, GraceKind::None)).unwrap();

    assert_eq!(ignored.fixed_installment(), plain.fixed_installment());
    assert!(ignored.items().iter().all(|item| !item.is_grace_period));
}

#[test]
fn grace_equal_to_term_fails() {
    let terms = scenario_terms().with_grace(180, GraceKind::Total);
    assert_eq!(
        calculate(&terms).unwrap_err(),
        MortgageError::InvalidGracePeriod { grace_periods: 180, term_periods: 180 }
    );
}

#[test]
fn subsidy_covering_loan_fails() {
    let terms = scenario_terms().with_subsidy(180_000.0);
    assert!(matches!(
        calculate(&terms),
        Err(MortgageError::InvalidPrincipal { .. })
    ));
}

#[test]
fn subsidy_reduces_principal() {
    let result = calculate(&scenario_terms().with_subsidy(30_000.0)).unwrap();
    assert_eq!(result.principal_financed(), 150_000.0);
}

#[test]
fn charges_push_tcea_above_rate() {
    let mut terms = scenario_terms();
    terms.life_insurance_rate = 0.00028;
    terms.property_insurance_rate = 0.0030;
    terms.portes_fee = 3.50;
    terms.administration_fee = 10.0;
    terms.evaluation_fee = 350.0;
    terms.disbursement_fee = 200.0;

    let result = calculate(&terms).unwrap();

    assert_abs_diff_eq!(result.irr_base(), result.periodic_rate(), epsilon = 1e-9);
    assert!(result.irr_with_charges() > result.irr_base());
    assert!(result.tcea() > 0.10);
    assert_abs_diff_eq!(
        result.total_paid_with_charges() - result.total_paid_base(),
        result.total_charges(),
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        result.total_charges(),
        result.total_insurance() + result.total_administrative(),
        epsilon = 1e-6
    );
}

#[test]
fn quarterly_loan_uses_four_periods_a_year() {
    let mut terms = LoanTerms::new(200_000.0, 20_000.0, 180_000.0, 0.10, RateKind::Effective, 40)
        .with_calendar(90, 360)
        .with_npv_discount_rate(0.10);
    terms.property_insurance_rate = 0.003;
    terms.life_insurance_rate = 0.0008;
    terms.portes_fee = 3.5;
    terms.evaluation_fee = 350.0;

    let result = calculate(&terms).unwrap();

    assert_eq!(result.periods_per_year(), 4.0);
    assert_abs_diff_eq!(result.periodic_rate(), 1.1_f64.powf(0.25) - 1.0, epsilon = 1e-15);
    assert_eq!(result.items().len(), 40);

    // charges are per quarter, not per month
    for item in result.items() {
        assert_abs_diff_eq!(item.property_insurance, 200_000.0 * 0.003 / 4.0, epsilon = 1e-9);
    }

    assert_eq!(result.items()[3].year_number, 1);
    assert_eq!(result.items()[4].year_number, 2);
    assert_eq!(result.items()[39].year_number, 10);

    assert_eq!(result.tcea(), (1.0 + result.irr_with_charges()).powf(4.0) - 1.0);
    assert!(result.tcea() > 0.10);
    assert_abs_diff_eq!(
        (1.0 + result.irr_base()).powf(4.0) - 1.0,
        0.10,
        epsilon = 1e-9
    );

    // the discount rate is converted with the same calendar
    assert_abs_diff_eq!(result.npv().unwrap(), 0.0, epsilon = 1e-6);
}

#[test]
fn actual_365_calendar() {
    let mut terms = LoanTerms::new(200_000.0, 20_000.0, 180_000.0, 0.12, RateKind::Nominal, 36)
        .with_calendar(30, 365);
    terms.property_insurance_rate = 0.003;
    terms.administration_fee = 10.0;

    let result = calculate(&terms).unwrap();
    let ppy = 365.0 / 30.0;

    assert_eq!(result.periods_per_year(), ppy);
    assert_abs_diff_eq!(result.periodic_rate(), 0.12 / ppy, epsilon = 1e-15);
    assert_abs_diff_eq!(
        result.items()[0].property_insurance,
        200_000.0 * 0.003 / ppy,
        epsilon = 1e-9
    );

    // 12.17 periods a year: period 13 is the first of year two
    assert_eq!(result.items()[11].year_number, 1);
    assert_eq!(result.items()[12].year_number, 2);
    assert_eq!(result.items()[24].year_number, 3);

    assert_eq!(result.tcea(), (1.0 + result.irr_with_charges()).powf(ppy) - 1.0);
}

#[test]
fn bank_preset_sets_calendar() {
    let terms = LoanTerms::new(200_000.0, 20_000.0, 180_000.0, 0.10, RateKind::Nominal, 180)
        .with_bank(&BankProfile::interbank());

    assert_eq!(terms.rate_kind, RateKind::Effective);
    let result = calculate(&terms).unwrap();
    assert_eq!(result.periods_per_year(), 12.0);
    assert_abs_diff_eq!(result.fixed_installment(), 1887.10, epsilon = 0.01);
}

#[test]
fn patch_reruns_whole_calculation() {
    let calculator = MortgageCalculator::default();
    let terms = scenario_terms();

    let patch = LoanTermsPatch {
        currency: Some(Currency::Usd),
        property_price: Some(55_000.0),
        down_payment: Some(5_000.0),
        loan_amount: Some(50_000.0),
        ..Default::default()
    };
    let (next, result) = calculator.recalculate(&terms, &patch).unwrap();

    assert_eq!(next.currency, Currency::Usd);
    assert_eq!(result.principal_financed(), 50_000.0);
    assert_eq!(terms.loan_amount, 180_000.0);

    let missing_amounts = LoanTermsPatch {
        currency: Some(Currency::Usd),
        ..Default::default()
    };
    assert!(matches!(
        calculator.recalculate(&terms, &missing_amounts),
        Err(MortgageError::InvalidPatch(_))
    ));
}

#[test]
fn csv_batch_end_to_end() {
    let data = "\
loan_id,property_price,down_payment,loan_amount,annual_interest_rate,rate_kind,bank,term_months,term_years,grace_periods,grace_kind
1,200000,20000,180000,0.10,EFFECTIVE,,180,,0,NONE
2,200000,20000,180000,10,,INTERBANK,,15,6,TOTAL
3,200000,20000,180000,0.10,NOMINAL,,120,,12,PARTIAL
";
    let loans = load_loans_from_reader(data.as_bytes()).unwrap();
    assert_eq!(loans.len(), 3);

    let outcomes = ScenarioRunner::new().run_batch(&loans);
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));
    assert_eq!(outcomes[1].result.as_ref().unwrap().items().len(), 180);

    let plain = outcomes[0].result.as_ref().unwrap();
    let grace = outcomes[1].result.as_ref().unwrap();
    assert!(grace.fixed_installment() > plain.fixed_installment());
}

#[test]
fn csv_row_with_grace_covering_term_is_rejected() {
    let data = "\
loan_id,property_price,down_payment,loan_amount,annual_interest_rate,rate_kind,term_months,grace_periods,grace_kind
3,200000,20000,180000,0.10,NOMINAL,12,12,PARTIAL
";
    let err = load_loans_from_reader(data.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("Loan 3"));
}

use crate::core::{PlanField, PlanInput};

/// Query keys and their plan fields, in the order permalinks are
/// rendered. The short names are the shareable-URL contract.
const FIELD_KEYS: [(&str, PlanField); 8] = [
    ("inc", PlanField::AnnualIncome),
    ("exp", PlanField::AnnualExpenses),
    ("cur", PlanField::CurrentCorpus),
    ("ret", PlanField::InvestmentReturnRate),
    ("inf", PlanField::InflationRate),
    ("tar", PlanField::TargetCorpus),
    ("yrs", PlanField::YearsToRetire),
    ("age", PlanField::CurrentAge),
];

/// Decodes a permalink query string into a plan. Unknown keys are
/// ignored; missing or unparsable values keep the default for that
/// field, so any string decodes to a usable plan.
pub fn decode(query: &str) -> PlanInput {
    let mut plan = PlanInput::default();
    for pair in query.trim_start_matches('?').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let Some(field) = field_for_key(key) else {
            continue;
        };
        if let Ok(value) = value.trim().parse::<f64>() {
            plan.apply(field, value);
        }
    }
    plan.normalized()
}

/// Renders the plan as a query string with a stable key order, so equal
/// plans produce identical permalinks.
pub fn encode(input: &PlanInput) -> String {
    FIELD_KEYS
        .iter()
        .map(|(key, field)| format!("{key}={}", format_number(field_value(input, *field))))
        .collect::<Vec<_>>()
        .join("&")
}

fn field_for_key(key: &str) -> Option<PlanField> {
    FIELD_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, field)| *field)
}

fn field_value(input: &PlanInput, field: PlanField) -> f64 {
    match field {
        PlanField::CurrentAge => input.current_age as f64,
        PlanField::CurrentCorpus => input.current_corpus,
        PlanField::AnnualIncome => input.annual_income,
        PlanField::AnnualExpenses => input.annual_expenses,
        PlanField::InvestmentReturnRate => input.investment_return_rate,
        PlanField::InflationRate => input.inflation_rate,
        PlanField::TargetCorpus => input.target_corpus,
        PlanField::YearsToRetire => input.years_to_retire as f64,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlanMode {
    Income,
    Goal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanField {
    CurrentAge,
    CurrentCorpus,
    AnnualIncome,
    AnnualExpenses,
    InvestmentReturnRate,
    InflationRate,
    TargetCorpus,
    YearsToRetire,
}

/// The single editable plan record. Rates are stored as percentages and
/// divided by 100 at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub current_age: u32,
    pub current_corpus: f64,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub investment_return_rate: f64,
    pub inflation_rate: f64,
    pub target_corpus: f64,
    pub years_to_retire: u32,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            current_age: 25,
            current_corpus: 0.0,
            annual_income: 1_500_000.0,
            annual_expenses: 800_000.0,
            investment_return_rate: 10.0,
            inflation_rate: 6.0,
            target_corpus: 50_000_000.0,
            years_to_retire: 15,
        }
    }
}

impl PlanInput {
    /// Applies a single field edit. A non-finite value keeps the prior
    /// valid value; monetary fields clamp at zero, age and years clamp
    /// into their allowed ranges.
    pub fn apply(&mut self, field: PlanField, value: f64) {
        if !value.is_finite() {
            return;
        }
        match field {
            PlanField::CurrentAge => self.current_age = clamp_age(value),
            PlanField::CurrentCorpus => self.current_corpus = clamp_money(value),
            PlanField::AnnualIncome => self.annual_income = clamp_money(value),
            PlanField::AnnualExpenses => self.annual_expenses = clamp_money(value),
            PlanField::InvestmentReturnRate => self.investment_return_rate = value,
            PlanField::InflationRate => self.inflation_rate = value,
            PlanField::TargetCorpus => self.target_corpus = clamp_money(value),
            PlanField::YearsToRetire => self.years_to_retire = clamp_years(value),
        }
    }

    /// Re-coerces every field into its valid range. Used when a whole
    /// record arrives from outside (persisted state, permalinks).
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.current_age = self.current_age.clamp(1, 120);
        self.years_to_retire = self.years_to_retire.clamp(1, 50);
        self.current_corpus = normal_money(self.current_corpus);
        self.annual_income = normal_money(self.annual_income);
        self.annual_expenses = normal_money(self.annual_expenses);
        self.target_corpus = normal_money(self.target_corpus);
        self.investment_return_rate =
            normal_rate(self.investment_return_rate, defaults.investment_return_rate);
        self.inflation_rate = normal_rate(self.inflation_rate, defaults.inflation_rate);
        self
    }

    pub fn annual_savings(&self) -> f64 {
        self.annual_income - self.annual_expenses
    }
}

fn clamp_money(value: f64) -> f64 {
    value.max(0.0)
}

fn clamp_age(value: f64) -> u32 {
    (value.round() as i64).clamp(1, 120) as u32
}

fn clamp_years(value: f64) -> u32 {
    (value.round() as i64).clamp(1, 50) as u32
}

fn normal_money(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn normal_rate(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// The six named corpus targets. `coast` is `None` when the real rate of
/// return is non-positive and no finite corpus can coast to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireTargets {
    pub lean: f64,
    pub barista: f64,
    pub traditional: f64,
    pub slow: f64,
    pub fat: f64,
    pub coast: Option<f64>,
}

impl FireTargets {
    /// Scenario name and corpus pairs in display order. `None` marks a
    /// scenario with no reachable corpus.
    pub fn named(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("coast", self.coast),
            ("barista", Some(self.barista)),
            ("lean", Some(self.lean)),
            ("traditional", Some(self.traditional)),
            ("slow", Some(self.slow)),
            ("fat", Some(self.fat)),
        ]
    }
}

/// Years until a target corpus is reached, or `Unreachable` when the plan
/// can never get there. Callers render `Unreachable` as "never"; it is a
/// displayable state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Years(u32),
    Unreachable,
}

impl Timeline {
    pub fn years(self) -> Option<u32> {
        match self {
            Timeline::Years(n) => Some(n),
            Timeline::Unreachable => None,
        }
    }

    pub fn is_unreachable(self) -> bool {
        matches!(self, Timeline::Unreachable)
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timeline::Years(n) => serializer.serialize_u32(*n),
            Timeline::Unreachable => serializer.serialize_str("never"),
        }
    }
}

/// Goal-mode solver output. `annual_savings` is the unrounded required
/// contribution; `monthly_savings` is rounded to the nearest rupee and
/// `required_annual_income` is derived from the rounded figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub annual_savings: f64,
    pub monthly_savings: f64,
    pub required_annual_income: f64,
}

impl SavingsPlan {
    pub fn already_met() -> Self {
        Self {
            annual_savings: 0.0,
            monthly_savings: 0.0,
            required_annual_income: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_prior_value_for_non_finite_input() {
        let mut plan = PlanInput::default();
        plan.apply(PlanField::AnnualIncome, f64::NAN);
        assert_eq!(plan.annual_income, 1_500_000.0);
        plan.apply(PlanField::InflationRate, f64::INFINITY);
        assert_eq!(plan.inflation_rate, 6.0);
    }

    #[test]
    fn apply_clamps_monetary_fields_at_zero() {
        let mut plan = PlanInput::default();
        plan.apply(PlanField::CurrentCorpus, -5_000.0);
        assert_eq!(plan.current_corpus, 0.0);
        plan.apply(PlanField::TargetCorpus, -1.0);
        assert_eq!(plan.target_corpus, 0.0);
    }

    #[test]
    fn apply_clamps_age_and_years_into_range() {
        let mut plan = PlanInput::default();
        plan.apply(PlanField::CurrentAge, 900.0);
        assert_eq!(plan.current_age, 120);
        plan.apply(PlanField::CurrentAge, 0.0);
        assert_eq!(plan.current_age, 1);
        plan.apply(PlanField::YearsToRetire, 0.0);
        assert_eq!(plan.years_to_retire, 1);
        plan.apply(PlanField::YearsToRetire, 80.0);
        assert_eq!(plan.years_to_retire, 50);
    }

    #[test]
    fn normalized_repairs_out_of_range_records() {
        let plan = PlanInput {
            current_age: 0,
            current_corpus: -10.0,
            annual_income: f64::NAN,
            annual_expenses: 800_000.0,
            investment_return_rate: f64::NAN,
            inflation_rate: 6.0,
            target_corpus: 50_000_000.0,
            years_to_retire: 99,
        }
        .normalized();

        assert_eq!(plan.current_age, 1);
        assert_eq!(plan.current_corpus, 0.0);
        assert_eq!(plan.annual_income, 0.0);
        assert_eq!(plan.investment_return_rate, 10.0);
        assert_eq!(plan.years_to_retire, 50);
    }

    #[test]
    fn timeline_serializes_as_number_or_never() {
        let json = serde_json::to_string(&Timeline::Years(12)).expect("timeline must serialize");
        assert_eq!(json, "12");
        let json =
            serde_json::to_string(&Timeline::Unreachable).expect("timeline must serialize");
        assert_eq!(json, "\"never\"");
    }

    #[test]
    fn plan_field_deserializes_from_camel_case_names() {
        let field: PlanField =
            serde_json::from_str("\"annualExpenses\"").expect("field must deserialize");
        assert_eq!(field, PlanField::AnnualExpenses);
        assert!(serde_json::from_str::<PlanField>("\"notAField\"").is_err());
    }

    #[test]
    fn plan_input_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&PlanInput::default()).expect("plan must serialize");
        assert!(json.contains("\"currentAge\":25"));
        assert!(json.contains("\"annualIncome\":1500000.0"));
        assert!(json.contains("\"yearsToRetire\":15"));

        let back: PlanInput = serde_json::from_str(&json).expect("plan must deserialize");
        assert_eq!(back, PlanInput::default());
    }
}

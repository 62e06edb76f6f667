use super::types::{FireTargets, PlanInput, SavingsPlan, Timeline};

/// Corpus multiples over annual expenses for each scenario. The 25x figure
/// is the 4% safe-withdrawal rule; the others scale it for leaner or
/// richer lifestyles.
pub const TRADITIONAL_MULTIPLE: f64 = 25.0;
pub const LEAN_MULTIPLE: f64 = 20.0;
pub const FAT_MULTIPLE: f64 = 50.0;
pub const BARISTA_MULTIPLE: f64 = 15.0;

/// Reference age the coast scenario compounds towards.
pub const COAST_TARGET_AGE: u32 = 60;

/// Savings discipline assumed when translating a required contribution
/// into a required income.
pub const ASSUMED_SAVINGS_RATE: f64 = 0.4;

/// Real rates with magnitude below this are treated as zero so the
/// annuity formulas degrade to their linear forms instead of dividing by
/// a vanishing rate.
pub const RATE_EPSILON: f64 = 0.001;

/// Inflation-adjusted rate of return: (1 + nominal) / (1 + inflation) - 1.
pub fn real_rate(input: &PlanInput) -> f64 {
    let nominal = input.investment_return_rate / 100.0;
    let inflation = input.inflation_rate / 100.0;
    (1.0 + nominal) / (1.0 + inflation) - 1.0
}

pub fn fire_targets(input: &PlanInput) -> FireTargets {
    let expenses = input.annual_expenses.max(0.0);
    let traditional = expenses * TRADITIONAL_MULTIPLE;

    FireTargets {
        lean: expenses * LEAN_MULTIPLE,
        barista: expenses * BARISTA_MULTIPLE,
        traditional,
        // Same target corpus; the slow path only differs in savings pace.
        slow: traditional,
        fat: expenses * FAT_MULTIPLE,
        coast: coast_target(input, traditional),
    }
}

/// Lump sum needed today that compounds to the traditional target by age
/// 60 with no further contributions. Without positive real growth no
/// finite sum coasts there, so the result is `None` rather than a number
/// produced by clamping the rate.
fn coast_target(input: &PlanInput, traditional: f64) -> Option<f64> {
    let r = real_rate(input);
    if r <= 0.0 {
        return None;
    }
    let years = COAST_TARGET_AGE.saturating_sub(input.current_age);
    Some(traditional / (1.0 + r).powi(years as i32))
}

/// Scenario shares of the dream corpus in goal mode, where the target is
/// chosen directly instead of derived from expenses.
pub const GOAL_LEAN_SHARE: f64 = 0.7;
pub const GOAL_BARISTA_SHARE: f64 = 0.55;
pub const GOAL_FAT_SHARE: f64 = 2.0;

/// Goal-mode variant of the comparison grid: every scenario scales off
/// the chosen target corpus, and coast discounts it over the plan's own
/// horizon rather than to a fixed age.
pub fn goal_targets(input: &PlanInput) -> FireTargets {
    let target = input.target_corpus.max(0.0);
    let r = real_rate(input);
    let coast = if r > 0.0 {
        Some(target / (1.0 + r).powi(input.years_to_retire as i32))
    } else {
        None
    };

    FireTargets {
        lean: target * GOAL_LEAN_SHARE,
        barista: target * GOAL_BARISTA_SHARE,
        traditional: target,
        slow: target,
        fat: target * GOAL_FAT_SHARE,
        coast,
    }
}

/// Forward ordinary-annuity accumulation: principal compounds at `rate`
/// while `contribution` is added once per year. This is the formula the
/// solvers below invert.
pub fn future_value(principal: f64, contribution: f64, rate: f64, years: u32) -> f64 {
    let growth = (1.0 + rate).powi(years as i32);
    let annuity = if rate.abs() < RATE_EPSILON {
        years as f64
    } else {
        (growth - 1.0) / rate
    };
    principal * growth + contribution * annuity
}

/// Whole years until `target` is reached from the current corpus with an
/// annual contribution of income minus expenses (or `savings_override`).
/// Ceiling-rounded so a plan is never reported reached early.
pub fn years_to_target(target: f64, input: &PlanInput, savings_override: Option<f64>) -> Timeline {
    let corpus = input.current_corpus;
    if corpus >= target {
        return Timeline::Years(0);
    }

    let contribution = savings_override.unwrap_or_else(|| input.annual_savings());
    let r = real_rate(input);

    if contribution <= 0.0 && (r <= 0.0 || corpus <= 0.0 || corpus * r + contribution <= 0.0) {
        return Timeline::Unreachable;
    }

    if r.abs() < RATE_EPSILON {
        if contribution <= 0.0 {
            return Timeline::Unreachable;
        }
        let years = ((target - corpus) / contribution).ceil();
        return Timeline::Years(years.max(0.0) as u32);
    }

    let numerator = contribution + target * r;
    let denominator = contribution + corpus * r;
    if denominator <= 0.0 || numerator / denominator <= 0.0 {
        return Timeline::Unreachable;
    }

    let years = (numerator / denominator).ln() / (1.0 + r).ln();
    if !years.is_finite() {
        return Timeline::Unreachable;
    }
    Timeline::Years(years.max(0.0).ceil() as u32)
}

/// Goal-mode reverse solve: the annual contribution that closes the gap
/// between the compounded current corpus and the target corpus over the
/// configured horizon.
pub fn required_savings(input: &PlanInput) -> SavingsPlan {
    let years = input.years_to_retire;
    if years == 0 {
        return SavingsPlan::already_met();
    }

    let r = real_rate(input);
    let growth = (1.0 + r).powi(years as i32);
    let gap = input.target_corpus - input.current_corpus * growth;
    if gap <= 0.0 {
        return SavingsPlan::already_met();
    }

    let annual = if r.abs() < RATE_EPSILON {
        gap / years as f64
    } else {
        gap * r / (growth - 1.0)
    };

    let monthly = (annual / 12.0).round();
    SavingsPlan {
        annual_savings: annual,
        monthly_savings: monthly,
        required_annual_income: monthly * 12.0 / ASSUMED_SAVINGS_RATE,
    }
}

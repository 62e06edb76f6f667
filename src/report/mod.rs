use chrono::NaiveDate;

use crate::core::{self, PlanInput, PlanMode, Timeline};

/// How a monetary amount is rendered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AmountStyle {
    /// Magnitude-scaled: `₹1.50 Cr`, `₹8.00 L`, `₹4.5k`.
    Compact,
    /// Indian digit grouping: `₹1,50,00,000`.
    Exact,
}

/// Formats a rupee amount at thousand/lakh/crore breakpoints.
pub fn format_inr(value: f64, style: AmountStyle) -> String {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
    match style {
        AmountStyle::Exact => format!("₹{}", group_indian(value.round() as i64)),
        AmountStyle::Compact => {
            if value >= 10_000_000.0 {
                format!("₹{:.2} Cr", value / 10_000_000.0)
            } else if value >= 100_000.0 {
                format!("₹{:.2} L", value / 100_000.0)
            } else if value >= 1_000.0 {
                format!("₹{:.1}k", value / 1_000.0)
            } else {
                format!("₹{}", group_indian(value.round() as i64))
            }
        }
    }
}

/// Indian grouping: the last three digits, then pairs. `15000000`
/// becomes `1,50,00,000`.
fn group_indian(value: i64) -> String {
    let digits = value.abs().to_string().into_bytes();
    let mut grouped = Vec::with_capacity(digits.len() + digits.len() / 2);
    for (pos, digit) in digits.iter().rev().enumerate() {
        if pos == 3 || (pos > 3 && (pos - 3) % 2 == 0) {
            grouped.push(b',');
        }
        grouped.push(*digit);
    }
    grouped.reverse();
    String::from_utf8(grouped).expect("digits and commas are ascii")
}

fn lakhs(value: f64) -> String {
    format!("Rs. {:.2} L", value / 100_000.0)
}

fn crores(value: f64) -> String {
    format!("Rs. {:.2} Cr", value / 10_000_000.0)
}

fn scenario_label(key: &str) -> &'static str {
    match key {
        "coast" => "Coast FIRE",
        "barista" => "Barista FIRE",
        "lean" => "Lean FIRE",
        "traditional" => "Traditional",
        "slow" => "Slow FIRE",
        "fat" => "Fat FIRE",
        _ => "Unknown",
    }
}

/// Renders the plan report for today. All numbers come from the same
/// engine calls the live API makes, so the report can never drift from
/// the interactive figures.
pub fn render_report(input: &PlanInput, mode: PlanMode) -> String {
    render_report_on(input, mode, chrono::Local::now().date_naive())
}

pub fn render_report_on(input: &PlanInput, mode: PlanMode, date: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str("FIRE FREEDOM PLAN\n");
    out.push_str(&format!("Generated: {}\n", date.format("%Y-%m-%d")));
    out.push_str("Every reality begins as a dream.\n\n");

    render_inputs(&mut out, input, mode);
    render_strategy(&mut out, input, mode);
    if mode == PlanMode::Income {
        render_benchmarks(&mut out, input);
    }

    out.push_str(
        "Calculations are personalized estimates for educational purposes only, not financial advice.\n",
    );
    out
}

fn render_inputs(out: &mut String, input: &PlanInput, mode: PlanMode) {
    out.push_str("1. Your Inputs\n");
    out.push_str("--------------\n");

    let mut lines = vec![
        format!("Current Age: {} Years", input.current_age),
        format!("Return Rate Assumption: {}%", input.investment_return_rate),
        format!("Inflation Assumption: {}%", input.inflation_rate),
        format!("Current Corpus: {}", lakhs(input.current_corpus)),
    ];
    match mode {
        PlanMode::Income => {
            lines.insert(0, format!("Annual Income: {}", lakhs(input.annual_income)));
            lines.insert(2, format!("Annual Expenses: {}", lakhs(input.annual_expenses)));
        }
        PlanMode::Goal => {
            lines.insert(0, format!("Dream Target: {}", crores(input.target_corpus)));
            lines.insert(2, format!("Timeline: {} Years", input.years_to_retire));
        }
    }

    for line in lines {
        out.push_str(&format!("  - {line}\n"));
    }
    out.push('\n');
}

fn render_strategy(out: &mut String, input: &PlanInput, mode: PlanMode) {
    out.push_str("2. The Strategy\n");
    out.push_str("---------------\n");

    match mode {
        PlanMode::Income => {
            let targets = core::fire_targets(input);
            match core::years_to_target(targets.traditional, input, None) {
                Timeline::Years(years) => {
                    out.push_str(&format!(
                        "You will attain your financial freedom through Traditional FIRE in {} years (at Age {}). With current savings of {}/yr, you're on track.\n",
                        years,
                        input.current_age + years,
                        lakhs(input.annual_savings()),
                    ));
                }
                Timeline::Unreachable => {
                    out.push_str(
                        "At the current savings rate, Traditional FIRE is never reached. Increase savings or expected returns to put a date on it.\n",
                    );
                }
            }
        }
        PlanMode::Goal => {
            let plan = core::required_savings(input);
            out.push_str(&format!(
                "You will attain your financial freedom through your Goal-Based Plan in {} years (at Age {}). Saving {} per month calls for an annual income of about {} at a 40% savings rate.\n",
                input.years_to_retire,
                input.current_age + input.years_to_retire,
                format_inr(plan.monthly_savings, AmountStyle::Compact),
                format_inr(plan.required_annual_income, AmountStyle::Compact),
            ));
        }
    }
    out.push('\n');
}

fn render_benchmarks(out: &mut String, input: &PlanInput) {
    out.push_str("3. FIRE Benchmarks\n");
    out.push_str("------------------\n");
    out.push_str(&format!(
        "  {:<14} {:>14} {:>10} {:>12}\n",
        "Type", "Corpus Needed", "Time", "Freedom Age"
    ));

    let targets = core::fire_targets(input);
    for (key, corpus) in targets.named() {
        let label = scenario_label(key);
        let Some(corpus) = corpus else {
            out.push_str(&format!(
                "  {label:<14} {:>14} {:>10} {:>12}\n",
                "Unreachable", "Never", "Never"
            ));
            continue;
        };

        let (time, freedom_age) = match core::years_to_target(corpus, input, None) {
            Timeline::Years(0) => ("Done!".to_string(), input.current_age.to_string()),
            Timeline::Years(years) => (
                format!("{years} Years"),
                (input.current_age + years).to_string(),
            ),
            Timeline::Unreachable => ("Never".to_string(), "Never".to_string()),
        };
        out.push_str(&format!(
            "  {label:<14} {:>14} {time:>10} {freedom_age:>12}\n",
            crores(corpus)
        ));
    }
    out.push('\n');
}

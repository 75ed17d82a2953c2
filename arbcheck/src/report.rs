//! Literal value rendering and outcome summaries.

use crate::execution::TrialOutcome;

/// Literal textual rendering of a value for reports
///
/// Scalars use their natural `Display` form. Sequences render as a bracketed,
/// comma-separated list of their elements' renderings, recursively.
pub trait Repr {
    fn repr(&self) -> String;
}

macro_rules! impl_repr_display {
    ($($t:ty),*) => {
        $(
            impl Repr for $t {
                fn repr(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_repr_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    str
);

impl<T: Repr + ?Sized> Repr for &T {
    fn repr(&self) -> String {
        (**self).repr()
    }
}

impl<T: Repr> Repr for [T] {
    fn repr(&self) -> String {
        let items: Vec<String> = self.iter().map(Repr::repr).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: Repr> Repr for Vec<T> {
    fn repr(&self) -> String {
        self.as_slice().repr()
    }
}

impl<T: Repr, const N: usize> Repr for [T; N] {
    fn repr(&self) -> String {
        self.as_slice().repr()
    }
}

/// Render the final outcome as one of the three summary lines
pub fn summarize<T: Repr>(outcome: &TrialOutcome<T>) -> String {
    if !outcome.failed {
        return format!("Passed {} tests.", outcome.trials_run);
    }

    let input = outcome
        .minimal_counterexample
        .as_ref()
        .or(outcome.failing_value.as_ref())
        .map(Repr::repr)
        .unwrap_or_default();

    if outcome.shrink_count == 0 {
        format!(
            "Failed after {} tests, with input `{}'",
            outcome.trials_run, input
        )
    } else {
        format!(
            "Failed after {} tests (with {} shrinks), with input `{}'",
            outcome.trials_run, outcome.shrink_count, input
        )
    }
}

/// Per-trial line emitted in verbose mode
pub fn trial_line<T: Repr + ?Sized>(trial: usize, value: &T, passed: bool) -> String {
    let verdict = if passed { "passed" } else { "failed" };
    format!("Trial {}: `{}' {}", trial, value.repr(), verdict)
}

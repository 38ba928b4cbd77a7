//! Run-wide label generation
//!
//! All labels live in one flat namespace. Generated labels draw their
//! uniqueness from two counters that are owned by the generator of a single
//! translation run and are never reset between units, so comparison blocks
//! and return addresses cannot collide across files or recursive calls.
//!
//! Generated labels carry at least two `$` separators. VM identifiers cannot
//! contain `$`, and a scoped VM label (`Function$label`) has exactly one, so
//! the two families never meet.

/// Counter state of one translation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeneratorState {
    /// Comparisons translated so far
    next_comparison: u32,

    /// Call sites translated so far
    next_call: u32,
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the label block for one comparison
    pub fn next_comparison_labels(&mut self) -> ComparisonLabels {
        let labels = ComparisonLabels::new(self.next_comparison);
        self.next_comparison += 1;
        labels
    }

    /// Return-address label for a call site of `callee`
    pub fn next_return_label(&mut self, callee: &str) -> String {
        let label = format!("{}$ret${}", callee, self.next_call);
        self.next_call += 1;
        label
    }

    pub fn comparisons(&self) -> u32 {
        self.next_comparison
    }

    pub fn calls(&self) -> u32 {
        self.next_call
    }
}

/// Labels of one comparison block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLabels {
    /// Y >= 0
    pub y_non_negative: String,
    /// Y < 0 and X >= 0: X > Y without subtracting
    pub x_above: String,
    /// X >= 0 and Y >= 0
    pub both_non_negative: String,
    /// D holds X - Y or its sign stand-in
    pub classify: String,
    pub when_true: String,
    pub done: String,
}

impl ComparisonLabels {
    fn new(id: u32) -> Self {
        let name = |part: &str| format!("CMP${}${}", id, part);
        Self {
            y_non_negative: name("Y_NONNEG"),
            x_above: name("X_ABOVE"),
            both_non_negative: name("BOTH_NONNEG"),
            classify: name("CLASSIFY"),
            when_true: name("TRUE"),
            done: name("DONE"),
        }
    }
}

/// Scope a language-level branch label by its enclosing function
pub fn scoped_label(scope: &str, label: &str) -> String {
    format!("{}${}", scope, label)
}

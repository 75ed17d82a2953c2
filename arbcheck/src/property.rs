//! Property definition trait.

/// A boolean predicate over generated values
///
/// Any `Fn(&T) -> bool` closure is a property. Returning `false` falsifies the property
/// for that input.
pub trait Property<T> {
    /// Evaluate the property against one input
    fn holds(&self, input: &T) -> bool;
}

impl<T, F> Property<T> for F
where
    F: Fn(&T) -> bool,
{
    fn holds(&self, input: &T) -> bool {
        self(input)
    }
}

/// The negation of a property
///
/// Handy for asserting that a property is falsifiable.
pub struct Not<P>(pub P);

impl<T, P: Property<T>> Property<T> for Not<P> {
    fn holds(&self, input: &T) -> bool {
        !self.0.holds(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even;

    impl Property<u32> for Even {
        fn holds(&self, input: &u32) -> bool {
            input % 2 == 0
        }
    }

    #[test]
    fn test_closure_property() {
        let positive = |value: &i32| *value > 0;
        assert!(positive.holds(&3));
        assert!(!positive.holds(&-3));
    }

    #[test]
    fn test_struct_property_and_negation() {
        assert!(Even.holds(&4));
        assert!(!Not(Even).holds(&4));
        assert!(Not(Even).holds(&5));
    }
}

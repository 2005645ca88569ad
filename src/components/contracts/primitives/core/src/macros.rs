/// A value supplied through a type, so module configs can carry data.
pub trait Get<T> {
    fn get() -> T;
}

/// Declares unit structs that implement [`Get`] by evaluating an expression.
///
/// `parameter_types! { pub Name: Type = expr; }`
#[macro_export]
macro_rules! parameter_types {
    (
        $( #[ $attr:meta ] )*
        $vis:vis $name:ident: $type:ty = $value:expr;
        $( $rest:tt )*
    ) => (
        $( #[ $attr ] )*
        $vis struct $name;

        impl $crate::macros::Get<$type> for $name {
            fn get() -> $type {
                $value
            }
        }

        $crate::parameter_types!( $( $rest )* );
    );
    () => ();
}

/// Return Err of the expression: `return Err($expression.into());`.
///
/// Used as `fail!(ContractError::NotFound(..))`.
#[macro_export]
macro_rules! fail {
    ( $y:expr ) => {{
        return Err($y.into());
    }};
}

/// Evaluate `$x:expr` and if not true return `Err($y:expr)`.
///
/// Used as `ensure!(expression_to_ensure, expression_to_return_on_false)`.
#[macro_export]
macro_rules! ensure {
    ( $x:expr, $y:expr $(,)? ) => {{
        if !$x {
            $crate::fail!($y);
        }
    }};
}

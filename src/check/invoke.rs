//! Calling a function with its arguments packed in a tuple

/// A callable that accepts its arguments as the tuple `Args`.
///
/// Implemented for every `FnMut` of up to eight arguments, so
/// `f.invoke((a, b))` is `f(a, b)`. Arguments are moved into the call,
/// never copied.
pub trait Invoke<Args> {
    /// Return type of the call
    type Output;

    /// Call `self` with `args` unpacked
    fn invoke(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Invoke<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Out,
        {
            type Output = Out;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8);

// Y combinator for recursive closures, open recursion form: the body receives
// its own handle as the first argument. No allocation per call.
use std::marker::PhantomData;

pub trait FnLike<A, B> {
    fn call(&self, x: A) -> B;
}

impl<A, B, F: Fn(A) -> B> FnLike<A, B> for F {
    fn call(&self, x: A) -> B {
        self(x)
    }
}

pub fn fix<A, B, F: Fn(&dyn FnLike<A, B>, A) -> B>(f: F) -> impl Fn(A) -> B {
    struct FixImpl<A, B, F: Fn(&dyn FnLike<A, B>, A) -> B>(F, PhantomData<(A, B)>);

    impl<A, B, F: Fn(&dyn FnLike<A, B>, A) -> B> FnLike<A, B> for FixImpl<A, B, F> {
        fn call(&self, x: A) -> B {
            (self.0)(self, x)
        }
    }

    let fix = FixImpl(f, PhantomData);
    move |x| fix.call(x)
}

// Recursion threading caller-owned mutable state, e.g. a visited array.
pub trait StateFnLike<S, A, B> {
    fn call(&self, state: &mut S, x: A) -> B;
}

impl<S, A, B, F: Fn(&mut S, A) -> B> StateFnLike<S, A, B> for F {
    fn call(&self, state: &mut S, x: A) -> B {
        self(state, x)
    }
}

pub fn fix_mut<S, A, B, F>(f: F) -> impl Fn(&mut S, A) -> B
where
    F: Fn(&dyn StateFnLike<S, A, B>, &mut S, A) -> B,
{
    struct FixMutImpl<S, A, B, F>(F, PhantomData<(S, A, B)>);

    impl<S, A, B, F> StateFnLike<S, A, B> for FixMutImpl<S, A, B, F>
    where
        F: Fn(&dyn StateFnLike<S, A, B>, &mut S, A) -> B,
    {
        fn call(&self, state: &mut S, x: A) -> B {
            (self.0)(self, state, x)
        }
    }

    let fix = FixMutImpl(f, PhantomData);
    move |state: &mut S, x: A| fix.call(state, x)
}

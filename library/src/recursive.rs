// Y combinator for anonymous recursive closures, strict (Z) form.
//
// `recursive(gen)` returns `rec` with `rec(x) == gen(rec)(x)`. The generator is
// only ever invoked when `rec` is called with an argument.
use std::rc::Rc;

pub type Rec<A, B> = Rc<dyn Fn(A) -> B>;

// x such that x.apply(&x) is the fixpoint. Recursive type, hence the newtype.
struct SelfApply<A, B>(Rc<dyn Fn(&SelfApply<A, B>) -> Rec<A, B>>);

impl<A, B> Clone for SelfApply<A, B> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<A, B> SelfApply<A, B> {
    fn apply(&self, x: &SelfApply<A, B>) -> Rec<A, B> {
        (self.0)(x)
    }
}

pub fn recursive<A, B, G, F>(gen: G) -> Rec<A, B>
where
    A: 'static,
    B: 'static,
    G: Fn(Rec<A, B>) -> F + 'static,
    F: Fn(A) -> B + 'static,
{
    log::trace!("constructing recursive closure");
    let gen = Rc::new(gen);
    let w = SelfApply(Rc::new(move |x: &SelfApply<A, B>| -> Rec<A, B> {
        let x = x.clone();
        let gen = Rc::clone(&gen);
        // self-application deferred until an argument arrives
        let deferred: Rec<A, B> = Rc::new(move |arg: A| (*gen)(x.apply(&x))(arg));
        deferred
    }));
    w.apply(&w)
}

// Same construction over Arc, for closures shared between threads.
pub mod sync {
    use std::sync::Arc;

    pub type Rec<A, B> = Arc<dyn Fn(A) -> B + Send + Sync>;

    struct SelfApply<A, B>(Arc<dyn Fn(&SelfApply<A, B>) -> Rec<A, B> + Send + Sync>);

    impl<A, B> Clone for SelfApply<A, B> {
        fn clone(&self) -> Self {
            Self(Arc::clone(&self.0))
        }
    }

    impl<A, B> SelfApply<A, B> {
        fn apply(&self, x: &SelfApply<A, B>) -> Rec<A, B> {
            (self.0)(x)
        }
    }

    pub fn recursive<A, B, G, F>(gen: G) -> Rec<A, B>
    where
        A: Send + 'static,
        B: Send + 'static,
        G: Fn(Rec<A, B>) -> F + Send + Sync + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        log::trace!("constructing shared recursive closure");
        let gen = Arc::new(gen);
        let w = SelfApply(Arc::new(move |x: &SelfApply<A, B>| -> Rec<A, B> {
            let x = x.clone();
            let gen = Arc::clone(&gen);
            let deferred: Rec<A, B> = Arc::new(move |arg: A| (*gen)(x.apply(&x))(arg));
            deferred
        }));
        w.apply(&w)
    }
}

use std::marker::PhantomData;

/// Suppresses the auto `Sync` impl of endpoint types.
pub(crate) type PhantomUnsync = PhantomData<std::cell::Cell<()>>;

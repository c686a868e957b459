mod lifecycle;

use super::*;
use crate::error::Error;
use std::{cell::Cell, rc::Rc};

///
/// CountingSource
///
/// Source over `0..len` that counts every extension-point call.
///

#[derive(Debug, Default)]
struct Calls {
    pages: Cell<usize>,
    totals: Cell<usize>,
    windows: Cell<Option<Option<FetchWindow>>>,
}

#[derive(Debug)]
struct CountingSource {
    len: usize,
    calls: Rc<Calls>,
}

impl CountingSource {
    fn new(len: usize) -> (Self, Rc<Calls>) {
        let calls = Rc::new(Calls::default());

        (
            Self {
                len,
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl DataSource for CountingSource {
    type Model = usize;
    type Error = Error;

    const KIND: &'static str = "counting";

    fn fetch_page(&mut self, window: Option<FetchWindow>) -> Result<Vec<usize>, Error> {
        self.calls.pages.set(self.calls.pages.get() + 1);
        self.calls.windows.set(Some(window));

        Ok(window.unwrap_or_default().range(self.len).collect())
    }

    fn fetch_keys(&self, models: &[usize]) -> Vec<Key> {
        models.iter().copied().map(Key::Index).collect()
    }

    fn fetch_total_count(&mut self) -> Result<usize, Error> {
        self.calls.totals.set(self.calls.totals.get() + 1);

        Ok(self.len)
    }
}

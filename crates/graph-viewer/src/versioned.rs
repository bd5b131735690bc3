// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value paired with a counter bumped every time it is replaced.
#[derive(Clone, Debug)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }
    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

/// A derived value recomputed only when its key changes.
pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return a reference to the
    /// cached value.
    pub fn get<'a>(&'a mut self, store: &S) -> &'a V {
        let key = (self.get_key)(store);
        let entry = match self.cached.take() {
            Some((last, value)) if last == key => (last, value),
            _ => {
                self.version = self.version.wrapping_add(1);
                (key, (self.calc)(store))
            }
        };
        &self.cached.insert(entry).1
    }

    /// Bumped each time the value is recomputed.
    pub fn version(&self) -> u64 {
        self.version
    }
}

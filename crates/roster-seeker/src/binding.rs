//! The binding: wires source, query, and surface into a live pipeline.
//!
//! Every notification from the source list, the query property, or the
//! surface's comparator property runs one synchronous pass:
//!
//! ```text
//! FilteredView::recompute -> SortedView::recompute -> surface.set_visible
//! ```
//!
//! Passes are never skipped, merged, or cancelled. A pass error (a malformed
//! record) is returned to whoever performed the write that triggered it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::error::Result;
use crate::filtered::FilteredView;
use crate::observable::{ListChange, ListenerId, ObservableList, Property};
use crate::ordering::Comparator;
use crate::set::StrategySet;
use crate::sorted::SortedView;
use crate::surface::DisplaySurface;

/// What caused a pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Initial pass when the binding is established.
    Bind,
    /// The query text changed.
    Query,
    /// The source collection changed.
    Source(ListChange),
    /// The surface picked a different comparator.
    Comparator,
    /// Explicit [`Binding::refresh`].
    Refresh,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Bind => write!(f, "bind"),
            Trigger::Query => write!(f, "query"),
            Trigger::Source(change) => write!(f, "source {}", change),
            Trigger::Comparator => write!(f, "comparator"),
            Trigger::Refresh => write!(f, "refresh"),
        }
    }
}

/// Counters describing the latest pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Records in the source collection.
    pub source_len: usize,
    /// Records that survived the filter.
    pub filtered_len: usize,
    /// Completed passes since the binding was established.
    pub passes: u64,
}

struct Pipeline<T, S> {
    source: ObservableList<T>,
    query: Property<String>,
    // Weak: the surface may own the pipeline (see `bind_live`).
    surface: Weak<S>,
    strategies: StrategySet<T>,
    filtered: RefCell<FilteredView<T>>,
    sorted: RefCell<SortedView<T>>,
    passes: Cell<u64>,
    source_listener: ListenerId,
    query_listener: ListenerId,
}

impl<T, S> Pipeline<T, S>
where
    T: Clone + 'static,
    S: DisplaySurface<T> + 'static,
{
    /// Builds the pipeline and subscribes it to the source and the query.
    ///
    /// Those listeners only hold a weak reference; whoever holds the
    /// returned `Rc` decides how long the pipeline lives.
    fn attach(
        source: &ObservableList<T>,
        query: &Property<String>,
        surface: &Rc<S>,
        strategies: StrategySet<T>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|pipeline: &Weak<Self>| {
            let on_source = Weak::clone(pipeline);
            let source_listener = source
                .subscribe(move |change| Self::relay(&on_source, Trigger::Source(*change)));

            let on_query = Weak::clone(pipeline);
            let query_listener = query.subscribe(move |_| Self::relay(&on_query, Trigger::Query));

            Pipeline {
                source: source.clone(),
                query: query.clone(),
                surface: Rc::downgrade(surface),
                strategies,
                filtered: RefCell::new(FilteredView::new()),
                sorted: RefCell::new(SortedView::new()),
                passes: Cell::new(0),
                source_listener,
                query_listener,
            }
        })
    }

    fn relay(pipeline: &Weak<Self>, trigger: Trigger) -> Result<()> {
        match pipeline.upgrade() {
            Some(pipeline) => pipeline.run(trigger),
            None => Ok(()),
        }
    }

    fn run(&self, trigger: Trigger) -> Result<()> {
        let Some(surface) = self.surface.upgrade() else {
            trace!(%trigger, "surface gone, pass skipped");
            return Ok(());
        };
        let query = self.query.get();
        // Read the comparator on every pass; never reuse one from an
        // earlier pass.
        let comparator = surface.comparator().get();

        let visible = {
            let mut filtered = self.filtered.borrow_mut();
            self.source.with(|records| {
                filtered
                    .recompute(records, &query, &self.strategies)
                    .map(|_| ())
            })?;
            let mut sorted = self.sorted.borrow_mut();
            sorted.recompute(filtered.items(), comparator.as_ref()).to_vec()
        };

        let shown = visible.len();
        surface.set_visible(visible);
        self.passes.set(self.passes.get() + 1);
        debug!(
            %trigger,
            shown,
            pass = self.passes.get(),
            "pipeline published"
        );
        Ok(())
    }

    fn stats(&self) -> PipelineStats {
        PipelineStats {
            source_len: self.source.len(),
            filtered_len: self.filtered.borrow().len(),
            passes: self.passes.get(),
        }
    }
}

impl<T, S> Drop for Pipeline<T, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.source_listener);
        self.query.unsubscribe(self.query_listener);
        debug!(passes = self.passes.get(), "binding removed");
    }
}

/// Handle to a live search-filter-sort pipeline.
///
/// The pipeline runs for as long as this handle is kept. Dropping it, or
/// calling [`unbind`](Self::unbind), removes every listener the binding
/// registered; the surface keeps whatever it showed last. Use [`bind_live`]
/// when the surface itself should own the pipeline.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use roster_seeker::{
///     Binding, Comparator, FnMatch, MemorySurface, ObservableList, Property, StrategySet,
/// };
///
/// let source = ObservableList::from(vec!["Anna".to_string(), "Ben".to_string()]);
/// let query = Property::new(String::new());
/// let surface = Rc::new(MemorySurface::new());
/// let strategies = StrategySet::new().with(FnMatch::new("name", |name: &String, q: &str| {
///     name.to_lowercase().contains(&q.to_lowercase())
/// }));
///
/// let binding = Binding::bind(&source, &query, Rc::clone(&surface), strategies).unwrap();
/// assert_eq!(surface.visible(), ["Anna", "Ben"]);
///
/// query.set("BE".to_string()).unwrap();
/// assert_eq!(surface.visible(), ["Ben"]);
///
/// source.push("Bert".to_string()).unwrap();
/// assert_eq!(surface.visible(), ["Ben", "Bert"]);
///
/// surface.sort_by(Comparator::by_key(|s: &String| s.clone()).reversed()).unwrap();
/// assert_eq!(surface.visible(), ["Bert", "Ben"]);
///
/// binding.unbind();
/// ```
pub struct Binding<T, S> {
    pipeline: Rc<Pipeline<T, S>>,
    comparator: Property<Option<Comparator<T>>>,
    comparator_listener: ListenerId,
    // Keeps the surface alive while the handle is.
    _surface: Rc<S>,
}

impl<T, S> Binding<T, S>
where
    T: Clone + 'static,
    S: DisplaySurface<T> + 'static,
{
    /// Subscribes to all three change sources and publishes the initial view.
    ///
    /// Returns the error of the initial pass, if any; no listeners remain
    /// registered in that case.
    pub fn bind(
        source: &ObservableList<T>,
        query: &Property<String>,
        surface: Rc<S>,
        strategies: StrategySet<T>,
    ) -> Result<Self> {
        let pipeline = Pipeline::attach(source, query, &surface, strategies);

        let comparator = surface.comparator();
        let on_comparator = Rc::downgrade(&pipeline);
        let comparator_listener = comparator
            .subscribe(move |_| Pipeline::relay(&on_comparator, Trigger::Comparator));

        let binding = Binding {
            pipeline,
            comparator,
            comparator_listener,
            _surface: surface,
        };
        binding.pipeline.run(Trigger::Bind)?;
        debug!(
            strategies = ?binding.pipeline.strategies.names(),
            "binding established"
        );
        Ok(binding)
    }

    /// Runs a pass without any change notification.
    pub fn refresh(&self) -> Result<()> {
        self.pipeline.run(Trigger::Refresh)
    }

    /// Counters for the latest pass.
    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Contents of the filtered view from the latest pass.
    pub fn filtered(&self) -> Vec<T> {
        self.pipeline.filtered.borrow().items().to_vec()
    }

    /// Contents of the sorted view from the latest pass.
    pub fn sorted(&self) -> Vec<T> {
        self.pipeline.sorted.borrow().items().to_vec()
    }

    /// Removes every listener the binding registered.
    ///
    /// Same as dropping the handle.
    pub fn unbind(self) {
        drop(self);
    }
}

impl<T, S> Drop for Binding<T, S> {
    fn drop(&mut self) {
        self.comparator.unsubscribe(self.comparator_listener);
    }
}

impl<T, S> fmt::Debug for Binding<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("strategies", &self.pipeline.strategies)
            .field("passes", &self.pipeline.passes.get())
            .finish()
    }
}

/// Establishes a live binding owned by the surface.
///
/// From this point on the surface's visible rows track the source, the
/// query, and the surface's comparator. The pipeline is released together
/// with the surface: once the last `Rc` to it is dropped, every listener
/// goes away and the source and query are no longer observed.
pub fn bind_live<T, S>(
    source: &ObservableList<T>,
    query: &Property<String>,
    surface: Rc<S>,
    strategies: StrategySet<T>,
) -> Result<()>
where
    T: Clone + 'static,
    S: DisplaySurface<T> + 'static,
{
    let pipeline = Pipeline::attach(source, query, &surface, strategies);
    pipeline.run(Trigger::Bind)?;
    // The comparator property belongs to the surface, so this listener
    // carries the pipeline's only strong reference.
    surface
        .comparator()
        .subscribe(move |_| pipeline.run(Trigger::Comparator));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeekerError;
    use crate::op::TextOp;
    use crate::ordering::OrderBy;
    use crate::strategy::FieldMatch;
    use crate::surface::MemorySurface;
    use crate::traits::Searchable;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        first: String,
        last: String,
    }

    impl Searchable for Person {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "first" => Value::Text(&self.first),
                "last" => Value::Text(&self.last),
                _ => Value::None,
            }
        }
    }

    fn person(first: &str, last: &str) -> Person {
        Person {
            first: first.into(),
            last: last.into(),
        }
    }

    struct Fixture {
        source: ObservableList<Person>,
        query: Property<String>,
        surface: Rc<MemorySurface<Person>>,
        binding: Binding<Person, MemorySurface<Person>>,
    }

    fn fixture() -> Fixture {
        let source = ObservableList::from(vec![person("Anna", "Smith"), person("Ben", "Anders")]);
        let query = Property::new(String::new());
        let surface = Rc::new(MemorySurface::new());
        let strategies = StrategySet::fields(["first", "last"], TextOp::Contains);
        let binding = Binding::bind(&source, &query, Rc::clone(&surface), strategies).unwrap();
        Fixture {
            source,
            query,
            surface,
            binding,
        }
    }

    fn lasts(surface: &MemorySurface<Person>) -> Vec<String> {
        surface.visible().into_iter().map(|p| p.last).collect()
    }

    #[test]
    fn bind_publishes_initial_view() {
        let f = fixture();
        assert_eq!(lasts(&f.surface), ["Smith", "Anders"]);
        assert_eq!(f.surface.render_count(), 1);
        assert_eq!(
            f.binding.stats(),
            PipelineStats {
                source_len: 2,
                filtered_len: 2,
                passes: 1
            }
        );
    }

    #[test]
    fn query_change_refilters() {
        let f = fixture();
        f.query.set("an".into()).unwrap();
        assert_eq!(lasts(&f.surface), ["Smith", "Anders"]);

        f.query.set("zzz".into()).unwrap();
        assert!(f.surface.is_empty());

        f.query.set("ben".into()).unwrap();
        assert_eq!(lasts(&f.surface), ["Anders"]);
    }

    #[test]
    fn source_insert_refilters_without_query_edit() {
        let f = fixture();
        f.query.set("an".into()).unwrap();

        f.source.push(person("Dana", "Kowalski")).unwrap();
        f.source.push(person("Zoe", "Lee")).unwrap();
        assert_eq!(lasts(&f.surface), ["Smith", "Anders", "Kowalski"]);

        f.source.remove(0).unwrap();
        assert_eq!(lasts(&f.surface), ["Anders", "Kowalski"]);
    }

    #[test]
    fn comparator_change_resorts() {
        let f = fixture();
        f.surface
            .sort_by(Comparator::by_field(OrderBy::asc("last")))
            .unwrap();
        assert_eq!(lasts(&f.surface), ["Anders", "Smith"]);

        f.surface
            .sort_by(Comparator::by_field(OrderBy::desc("last")))
            .unwrap();
        assert_eq!(lasts(&f.surface), ["Smith", "Anders"]);

        f.surface.clear_sort().unwrap();
        assert_eq!(lasts(&f.surface), ["Smith", "Anders"]);
    }

    #[test]
    fn filtered_view_keeps_source_order_under_sort() {
        let f = fixture();
        f.surface
            .sort_by(Comparator::by_field(OrderBy::asc("last")))
            .unwrap();
        assert_eq!(
            f.binding.filtered(),
            vec![person("Anna", "Smith"), person("Ben", "Anders")]
        );
        assert_eq!(
            f.binding.sorted(),
            vec![person("Ben", "Anders"), person("Anna", "Smith")]
        );
    }

    #[test]
    fn every_event_is_one_pass() {
        let f = fixture();
        f.query.set("a".into()).unwrap();
        f.source.push(person("Carl", "Jones")).unwrap();
        f.surface
            .sort_by(Comparator::by_field(OrderBy::asc("first")))
            .unwrap();
        f.binding.refresh().unwrap();
        assert_eq!(f.binding.stats().passes, 5);
        assert_eq!(f.surface.render_count(), 5);
    }

    #[test]
    fn malformed_record_reaches_the_writer() {
        let source = ObservableList::from(vec![person("Anna", "Smith")]);
        let query = Property::new(String::new());
        let surface = Rc::new(MemorySurface::new());
        let strategies = StrategySet::fields(["first", "middle"], TextOp::Contains);
        let _binding = Binding::bind(&source, &query, Rc::clone(&surface), strategies).unwrap();

        // "a" matches the first field before "middle" is consulted.
        query.set("a".into()).unwrap();
        assert_eq!(surface.len(), 1);

        assert_eq!(
            query.set("q".into()),
            Err(SeekerError::MissingField {
                field: "middle".into()
            })
        );
        // Surface still shows the last good pass.
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn failed_bind_leaves_no_listeners() {
        let source = ObservableList::from(vec![person("Anna", "Smith")]);
        let query = Property::new("x".to_string());
        let surface = Rc::new(MemorySurface::new());
        let strategies = StrategySet::fields(["middle"], TextOp::Contains);

        assert!(Binding::bind(&source, &query, Rc::clone(&surface), strategies).is_err());
        assert_eq!(source.listener_count(), 0);
        assert_eq!(query.listener_count(), 0);
        assert_eq!(surface.comparator().listener_count(), 0);
    }

    #[test]
    fn unbind_stops_updates() {
        let f = fixture();
        f.binding.unbind();
        f.query.set("zzz".into()).unwrap();
        assert_eq!(f.surface.len(), 2);
        assert_eq!(f.source.listener_count(), 0);
        assert_eq!(f.query.listener_count(), 0);
        assert_eq!(f.surface.comparator().listener_count(), 0);
    }

    #[test]
    fn dropped_binding_releases_the_surface() {
        let f = fixture();
        let surface = Rc::downgrade(&f.surface);
        let source = f.source.clone();
        let query = f.query.clone();
        drop(f);

        assert!(surface.upgrade().is_none());
        assert_eq!(source.listener_count(), 0);
        assert_eq!(query.listener_count(), 0);
        source.push(person("Carl", "Jones")).unwrap();
        query.set("carl".into()).unwrap();
    }

    #[test]
    fn bind_live_is_released_with_the_surface() {
        let source = ObservableList::from(vec![person("Anna", "Smith")]);
        let query = Property::new(String::new());
        let surface = Rc::new(MemorySurface::new());
        bind_live(
            &source,
            &query,
            Rc::clone(&surface),
            StrategySet::fields(["first", "last"], TextOp::Contains),
        )
        .unwrap();
        assert_eq!(source.listener_count(), 1);

        let weak = Rc::downgrade(&surface);
        drop(surface);
        assert!(weak.upgrade().is_none());
        assert_eq!(source.listener_count(), 0);
        assert_eq!(query.listener_count(), 0);
        query.set("anna".into()).unwrap();
    }

    #[test]
    fn bind_live_keeps_running_without_handle() {
        let source = ObservableList::new();
        let query = Property::new(String::new());
        let surface = Rc::new(MemorySurface::new());
        bind_live(
            &source,
            &query,
            Rc::clone(&surface),
            StrategySet::new().with(FieldMatch::contains("last")),
        )
        .unwrap();

        source.push(person("Anna", "Smith")).unwrap();
        query.set("smi".into()).unwrap();
        assert_eq!(lasts(&surface), ["Smith"]);
    }
}

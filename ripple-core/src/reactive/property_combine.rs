//! combineLatest for Properties
//!
//! Properties always hold a value, so a combined property never waits for
//! its sources. The getter reads every source getter. A change from one
//! source emits its value together with the other sources' live getters,
//! read at emission time.

use std::sync::Arc;

use crate::dispose::Disposable;

use super::read_only::Getter;
use super::{Observer, ReadOnlyProperty, Signal};

impl<A, B> ReadOnlyProperty<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    /// Combine two properties into a property of pairs.
    pub fn combine_latest2(a: &ReadOnlyProperty<A>, b: &ReadOnlyProperty<B>) -> Self {
        let (ga, gb) = (Arc::clone(&a.getter), Arc::clone(&b.getter));
        let (na, nb) = (a.new_values(), b.new_values());

        let new_values = {
            let (ga, gb) = (Arc::clone(&ga), Arc::clone(&gb));
            Signal::new(move |observer: Observer<(A, B)>| {
                Disposable::all([
                    {
                        let (observer, gb) = (observer.clone(), Arc::clone(&gb));
                        na.observe(move |a| observer.observe((a, gb())))
                    },
                    {
                        let (observer, ga) = (observer.clone(), Arc::clone(&ga));
                        nb.observe(move |b| observer.observe((ga(), b)))
                    },
                ])
            })
        };

        ReadOnlyProperty::new(move || (ga(), gb()), new_values)
    }
}

impl<A, B, C> ReadOnlyProperty<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Combine three properties into a property of triples.
    pub fn combine_latest3(
        a: &ReadOnlyProperty<A>,
        b: &ReadOnlyProperty<B>,
        c: &ReadOnlyProperty<C>,
    ) -> Self {
        let (ga, gb, gc) = (
            Arc::clone(&a.getter),
            Arc::clone(&b.getter),
            Arc::clone(&c.getter),
        );
        let (na, nb, nc) = (a.new_values(), b.new_values(), c.new_values());

        let new_values = {
            let (ga, gb, gc) = (Arc::clone(&ga), Arc::clone(&gb), Arc::clone(&gc));
            Signal::new(move |observer: Observer<(A, B, C)>| {
                Disposable::all([
                    {
                        let (observer, gb, gc) =
                            (observer.clone(), Arc::clone(&gb), Arc::clone(&gc));
                        na.observe(move |a| observer.observe((a, gb(), gc())))
                    },
                    {
                        let (observer, ga, gc) =
                            (observer.clone(), Arc::clone(&ga), Arc::clone(&gc));
                        nb.observe(move |b| observer.observe((ga(), b, gc())))
                    },
                    {
                        let (observer, ga, gb) =
                            (observer.clone(), Arc::clone(&ga), Arc::clone(&gb));
                        nc.observe(move |c| observer.observe((ga(), gb(), c)))
                    },
                ])
            })
        };

        ReadOnlyProperty::new(move || (ga(), gb(), gc()), new_values)
    }
}

impl<A, B, C, D> ReadOnlyProperty<(A, B, C, D)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    /// Combine four properties into a property of 4-tuples.
    pub fn combine_latest4(
        a: &ReadOnlyProperty<A>,
        b: &ReadOnlyProperty<B>,
        c: &ReadOnlyProperty<C>,
        d: &ReadOnlyProperty<D>,
    ) -> Self {
        let (ga, gb, gc, gd) = (
            Arc::clone(&a.getter),
            Arc::clone(&b.getter),
            Arc::clone(&c.getter),
            Arc::clone(&d.getter),
        );
        let (na, nb, nc, nd) = (a.new_values(), b.new_values(), c.new_values(), d.new_values());

        let new_values = {
            let (ga, gb, gc, gd) = (
                Arc::clone(&ga),
                Arc::clone(&gb),
                Arc::clone(&gc),
                Arc::clone(&gd),
            );
            Signal::new(move |observer: Observer<(A, B, C, D)>| {
                Disposable::all([
                    {
                        let (observer, gb, gc, gd) = (
                            observer.clone(),
                            Arc::clone(&gb),
                            Arc::clone(&gc),
                            Arc::clone(&gd),
                        );
                        na.observe(move |a| observer.observe((a, gb(), gc(), gd())))
                    },
                    {
                        let (observer, ga, gc, gd) = (
                            observer.clone(),
                            Arc::clone(&ga),
                            Arc::clone(&gc),
                            Arc::clone(&gd),
                        );
                        nb.observe(move |b| observer.observe((ga(), b, gc(), gd())))
                    },
                    {
                        let (observer, ga, gb, gd) = (
                            observer.clone(),
                            Arc::clone(&ga),
                            Arc::clone(&gb),
                            Arc::clone(&gd),
                        );
                        nc.observe(move |c| observer.observe((ga(), gb(), c, gd())))
                    },
                    {
                        let (observer, ga, gb, gc) = (
                            observer.clone(),
                            Arc::clone(&ga),
                            Arc::clone(&gb),
                            Arc::clone(&gc),
                        );
                        nd.observe(move |d| observer.observe((ga(), gb(), gc(), d)))
                    },
                ])
            })
        };

        ReadOnlyProperty::new(move || (ga(), gb(), gc(), gd()), new_values)
    }
}

impl<U: Clone + Send + Sync + 'static> ReadOnlyProperty<Vec<U>> {
    /// Combine any number of properties into a property of lists.
    pub fn combine_latest_all<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = ReadOnlyProperty<U>>,
    {
        let properties: Vec<ReadOnlyProperty<U>> = properties.into_iter().collect();
        let getters: Arc<[Getter<U>]> = properties.iter().map(|p| Arc::clone(&p.getter)).collect();
        let sources: Arc<[Signal<U>]> = properties.iter().map(|p| p.new_values()).collect();

        let new_values = {
            let getters = Arc::clone(&getters);
            Signal::new(move |observer: Observer<Vec<U>>| {
                sources
                    .iter()
                    .enumerate()
                    .map(|(changed, source)| {
                        let (observer, getters) = (observer.clone(), Arc::clone(&getters));
                        source.observe(move |u: U| {
                            let values = getters
                                .iter()
                                .enumerate()
                                .map(|(idx, getter)| if idx == changed { u.clone() } else { getter() })
                                .collect();
                            observer.observe(values);
                        })
                    })
                    .collect()
            })
        };

        ReadOnlyProperty::new(move || getters.iter().map(|getter| getter()).collect(), new_values)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispose::DisposePool;
    use crate::reactive::testing::Recorder;
    use crate::reactive::Property;

    #[test]
    fn two() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let property0 = Property::new("A");
        let property1 = Property::new(0);
        let combined =
            ReadOnlyProperty::combine_latest2(&property0.read_only(), &property1.read_only())
                .map(|(a, b)| format!("{a}{b}"));
        combined.values().subscribe(recorder.observer()).dispose_in(&pool);

        property0.set("B");
        property1.set(1);
        property0.set("C");
        property0.set("D");
        property1.set(2);
        property1.set(3);

        assert_eq!(recorder.values().join(", "), "A0, B0, B1, C1, D1, D2, D3");
        assert_eq!(combined.get(), "D3");
    }

    #[test]
    fn three() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let property0 = Property::new("A");
        let property1 = Property::new(0);
        let property2 = Property::new('a');
        let combined = ReadOnlyProperty::combine_latest3(
            &property0.read_only(),
            &property1.read_only(),
            &property2.read_only(),
        )
        .map(|(a, b, c)| format!("{a}{b}{c}"));
        combined.values().subscribe(recorder.observer()).dispose_in(&pool);

        property0.set("B");
        property1.set(1);
        property2.set('b');
        property0.set("C");
        property0.set("D");
        property1.set(2);
        property1.set(3);
        property2.set('c');
        property2.set('d');

        assert_eq!(
            recorder.values(),
            vec!["A0a", "B0a", "B1a", "B1b", "C1b", "D1b", "D2b", "D3b", "D3c", "D3d"]
        );
    }

    #[test]
    fn four() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let property0 = Property::new("A");
        let property1 = Property::new(0);
        let property2 = Property::new('b');
        let property3 = Property::new(0.0_f64);
        let combined = ReadOnlyProperty::combine_latest4(
            &property0.read_only(),
            &property1.read_only(),
            &property2.read_only(),
            &property3.read_only(),
        )
        .map(|(a, b, c, d)| format!("{a}{b}{c}{d}"));
        combined.values().subscribe(recorder.observer()).dispose_in(&pool);

        property2.set('b');
        property3.set(1.0);
        property0.set("C");
        property1.set(2);
        property2.set('d');
        property3.set(3.0);

        assert_eq!(
            recorder.values(),
            vec!["A0b0", "A0b0", "A0b1", "C0b1", "C2b1", "C2d1", "C2d3"]
        );
    }

    #[test]
    fn list() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let property0 = Property::new("A");
        let property1 = Property::new("0");
        let combined =
            ReadOnlyProperty::combine_latest_all([property0.read_only(), property1.read_only()])
                .map(|values| values.concat());
        combined.values().subscribe(recorder.observer()).dispose_in(&pool);

        property0.set("B");
        property1.set("1");
        property0.set("C");
        property0.set("D");
        property1.set("2");
        property1.set("3");

        assert_eq!(
            recorder.values(),
            vec!["A0", "B0", "B1", "C1", "D1", "D2", "D3"]
        );
    }

    #[test]
    fn two_of_the_same() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let property = Property::new(1);
        let combined =
            ReadOnlyProperty::combine_latest2(&property.read_only(), &property.read_only())
                .map(|(a, b)| a * 10 + b);
        combined.values().subscribe(recorder.observer()).dispose_in(&pool);

        property.set(2);
        property.set(3);
        property.set(4);

        assert_eq!(recorder.values(), vec![11, 22, 22, 33, 33, 44, 44]);
    }

    #[test]
    fn getter_reads_sources_without_subscribers() {
        let property0 = Property::new(1);
        let property1 = Property::new(2);
        let combined =
            ReadOnlyProperty::combine_latest_all([property0.read_only(), property1.read_only()]);

        property1.set(5);

        assert_eq!(combined.get(), vec![1, 5]);
    }
}

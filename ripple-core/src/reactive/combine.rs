//! combineLatest for Signals
//!
//! Combines several sources into one signal of tuples (or a `Vec` for the
//! list form). Each subscription keeps one "latest value per slot" record in
//! an [`Atomic`] cell:
//!
//! 1. A value from source `i` replaces slot `i` under the lock.
//! 2. Once every slot holds a value, the full record is emitted after the
//!    lock is released.
//! 3. From then on, every single value re-emits immediately, combined with
//!    the other slots' latest values.
//!
//! Subscribing the same signal twice gives two independent slots.

use std::sync::Arc;

use crate::dispose::Disposable;
use crate::sync::Atomic;

use super::{Observer, Signal};

/// Record of the N-ary form: one optional slot per source plus the number
/// of slots still empty.
struct Latest<U> {
    slots: Vec<Option<U>>,
    missing: usize,
}

impl<U: Clone> Latest<U> {
    fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
            missing: count,
        }
    }

    /// Store `value` in slot `idx` and return the full record if complete.
    fn update(&mut self, idx: usize, value: U) -> Option<Vec<U>> {
        if self.slots[idx].replace(value).is_none() {
            self.missing -= 1;
        }
        if self.missing > 0 {
            return None;
        }
        self.slots.iter().cloned().collect()
    }
}

impl<A, B> Signal<(A, B)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    /// Combine the latest values of two signals.
    pub fn combine_latest2(a: &Signal<A>, b: &Signal<B>) -> Self {
        let (a, b) = (a.clone(), b.clone());
        Signal::new(move |observer: Observer<(A, B)>| {
            let latest = Arc::new(Atomic::new((None::<A>, None::<B>)));

            let send = move |latest: (Option<A>, Option<B>)| {
                if let (Some(a), Some(b)) = latest {
                    observer.observe((a, b));
                }
            };
            let send = Arc::new(send);

            Disposable::all([
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    a.observe(move |v| {
                        send(latest.access(|l| {
                            l.0 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    b.observe(move |v| {
                        send(latest.access(|l| {
                            l.1 = Some(v);
                            l.clone()
                        }))
                    })
                },
            ])
        })
    }
}

impl<A, B, C> Signal<(A, B, C)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
{
    /// Combine the latest values of three signals.
    pub fn combine_latest3(a: &Signal<A>, b: &Signal<B>, c: &Signal<C>) -> Self {
        let (a, b, c) = (a.clone(), b.clone(), c.clone());
        Signal::new(move |observer: Observer<(A, B, C)>| {
            let latest = Arc::new(Atomic::new((None::<A>, None::<B>, None::<C>)));

            let send = Arc::new(move |latest: (Option<A>, Option<B>, Option<C>)| {
                if let (Some(a), Some(b), Some(c)) = latest {
                    observer.observe((a, b, c));
                }
            });

            Disposable::all([
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    a.observe(move |v| {
                        send(latest.access(|l| {
                            l.0 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    b.observe(move |v| {
                        send(latest.access(|l| {
                            l.1 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    c.observe(move |v| {
                        send(latest.access(|l| {
                            l.2 = Some(v);
                            l.clone()
                        }))
                    })
                },
            ])
        })
    }
}

impl<A, B, C, D> Signal<(A, B, C, D)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
{
    /// Combine the latest values of four signals.
    pub fn combine_latest4(a: &Signal<A>, b: &Signal<B>, c: &Signal<C>, d: &Signal<D>) -> Self {
        let (a, b, c, d) = (a.clone(), b.clone(), c.clone(), d.clone());
        Signal::new(move |observer: Observer<(A, B, C, D)>| {
            let latest = Arc::new(Atomic::new((
                None::<A>,
                None::<B>,
                None::<C>,
                None::<D>,
            )));

            let send = Arc::new(
                move |latest: (Option<A>, Option<B>, Option<C>, Option<D>)| {
                    if let (Some(a), Some(b), Some(c), Some(d)) = latest {
                        observer.observe((a, b, c, d));
                    }
                },
            );

            Disposable::all([
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    a.observe(move |v| {
                        send(latest.access(|l| {
                            l.0 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    b.observe(move |v| {
                        send(latest.access(|l| {
                            l.1 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    c.observe(move |v| {
                        send(latest.access(|l| {
                            l.2 = Some(v);
                            l.clone()
                        }))
                    })
                },
                {
                    let (latest, send) = (Arc::clone(&latest), Arc::clone(&send));
                    d.observe(move |v| {
                        send(latest.access(|l| {
                            l.3 = Some(v);
                            l.clone()
                        }))
                    })
                },
            ])
        })
    }
}

impl<U: Clone + Send + 'static> Signal<Vec<U>> {
    /// Combine the latest values of any number of signals.
    ///
    /// An empty list never emits.
    pub fn combine_latest_all<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = Signal<U>>,
    {
        let signals: Arc<[Signal<U>]> = signals.into_iter().collect();
        Signal::new(move |observer: Observer<Vec<U>>| {
            let latest = Arc::new(Atomic::new(Latest::new(signals.len())));

            signals
                .iter()
                .enumerate()
                .map(|(idx, signal)| {
                    let latest = Arc::clone(&latest);
                    let observer = observer.clone();
                    signal.observe(move |v| {
                        if let Some(values) = latest.access(|l| l.update(idx, v)) {
                            observer.observe(values);
                        }
                    })
                })
                .collect()
        })
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
    use crate::reactive::SignalPipe;

    #[test]
    fn two_waits_for_both_then_follows_each() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let pipe0 = SignalPipe::new();
        let pipe1 = SignalPipe::new();

        Signal::combine_latest2(&pipe0.signal(), &pipe1.signal())
            .map(|(a, b): (&str, i32)| format!("{a}{b}"))
            .subscribe(recorder.observer())
            .dispose_in(&pool);

        pipe0.send("A");
        pipe0.send("B");
        pipe1.send(0);
        pipe1.send(1);
        pipe0.send("C");
        pipe0.send("D");
        pipe1.send(2);
        pipe1.send(3);

        assert_eq!(recorder.values(), vec!["B0", "B1", "C1", "D1", "D2", "D3"]);
    }

    #[test]
    fn three() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let pipe0 = SignalPipe::new();
        let pipe1 = SignalPipe::new();
        let pipe2 = SignalPipe::new();

        Signal::combine_latest3(&pipe0.signal(), &pipe1.signal(), &pipe2.signal())
            .map(|(a, b, c): (&str, i32, char)| format!("{a}{b}{c}"))
            .subscribe(recorder.observer())
            .dispose_in(&pool);

        pipe0.send("A");
        pipe0.send("B");
        pipe1.send(0);
        pipe1.send(1);
        pipe2.send('a');
        pipe2.send('b');
        pipe0.send("C");
        pipe0.send("D");
        pipe1.send(2);
        pipe1.send(3);
        pipe2.send('c');
        pipe2.send('d');

        assert_eq!(
            recorder.values(),
            vec!["B1a", "B1b", "C1b", "D1b", "D2b", "D3b", "D3c", "D3d"]
        );
    }

    #[test]
    fn four() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let pipe0 = SignalPipe::new();
        let pipe1 = SignalPipe::new();
        let pipe2 = SignalPipe::new();
        let pipe3 = SignalPipe::new();

        Signal::combine_latest4(
            &pipe0.signal(),
            &pipe1.signal(),
            &pipe2.signal(),
            &pipe3.signal(),
        )
        .map(|(a, b, c, d): (&str, i32, char, f64)| format!("{a}{b}{c}{d}"))
        .subscribe(recorder.observer())
        .dispose_in(&pool);

        pipe0.send("A");
        pipe1.send(0);
        pipe2.send('b');
        pipe3.send(1.0);
        pipe0.send("C");
        pipe1.send(2);
        pipe2.send('d');
        pipe3.send(3.0);

        assert_eq!(
            recorder.values(),
            vec!["A0b1", "C0b1", "C2b1", "C2d1", "C2d3"]
        );
    }

    #[test]
    fn list() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let pipe0 = SignalPipe::new();
        let pipe1 = SignalPipe::new();

        Signal::combine_latest_all([pipe0.signal(), pipe1.signal()])
            .map(|values: Vec<&str>| values.concat())
            .subscribe(recorder.observer())
            .dispose_in(&pool);

        pipe0.send("A");
        pipe0.send("B");
        pipe1.send("0");
        pipe1.send("1");
        pipe0.send("C");
        pipe0.send("D");
        pipe1.send("2");
        pipe1.send("3");

        assert_eq!(recorder.values(), vec!["B0", "B1", "C1", "D1", "D2", "D3"]);
    }

    #[test]
    fn empty_list_never_emits() {
        let pool = DisposePool::new();
        let recorder = Recorder::<Vec<i32>>::new();

        Signal::combine_latest_all(Vec::new())
            .subscribe(recorder.observer())
            .dispose_in(&pool);

        assert!(recorder.values().is_empty());
    }

    #[test]
    fn same_signal_twice_tracks_two_slots() {
        let pool = DisposePool::new();
        let recorder = Recorder::new();
        let pipe = SignalPipe::new();

        Signal::combine_latest2(&pipe.signal(), &pipe.signal())
            .map(|(a, b): (i32, i32)| {
                let mut pair = [a, b];
                pair.sort();
                pair
            })
            .subscribe(recorder.observer())
            .dispose_in(&pool);

        for n in 1..=4 {
            pipe.send(n);
        }

        assert_eq!(
            recorder.values(),
            vec![[1, 1], [1, 2], [2, 2], [2, 3], [3, 3], [3, 4], [4, 4]]
        );
    }

    #[test]
    fn dispose_detaches_every_source() {
        let pipe0 = SignalPipe::<i32>::new();
        let pipe1 = SignalPipe::<i32>::new();

        let disposable = Signal::combine_latest_all([pipe0.signal(), pipe1.signal()]).observe(|_| {});
        assert_eq!(pipe0.observer_count(), 1);
        assert_eq!(pipe1.observer_count(), 1);

        disposable.dispose();
        assert_eq!(pipe0.observer_count(), 0);
        assert_eq!(pipe1.observer_count(), 0);
    }
}

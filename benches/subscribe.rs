use bencher::{benchmark_group, benchmark_main, Bencher};
use rxsingle::prelude::*;

fn subscribe_sync(b: &mut Bencher) {
  let single = Single::with_scheduler((), SyncScheduler);
  b.iter(|| single.subscribe(Noop).unwrap());
}

fn subscribe_pool(b: &mut Bencher) {
  let single = DefaultSingle::default();
  b.iter(|| {
    single.subscribe(Noop).unwrap();
    single.dispatched().unwrap().wait();
  });
}

fn subscribe_unsubscribe(b: &mut Bencher) {
  let single = Single::with_scheduler((), SyncScheduler);
  b.iter(|| {
    single.subscribe(Noop).unwrap();
    single.unsubscribe()
  });
}

benchmark_group!(benches, subscribe_sync, subscribe_pool, subscribe_unsubscribe);
benchmark_main!(benches);

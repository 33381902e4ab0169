mod common;

use std::sync::Arc;
use std::thread;

use common::{TEST_BEAN, bean_generator, field, object};
use fixtura_core::Instance;
use fixtura_generate::Generator;

fn spawn_requests(generator: &Arc<Generator>, workers: usize, rounds: usize) -> Vec<Instance> {
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let generator = Arc::clone(generator);
            thread::spawn(move || {
                (0..rounds)
                    .map(|_| generator.get_instance(TEST_BEAN).expect("bean"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("worker panicked"))
        .collect()
}

#[test]
fn each_call_keeps_its_own_cycle_guard() {
    let generator = Arc::new(bean_generator(false));
    let beans = spawn_requests(&generator, 8, 20);
    assert_eq!(beans.len(), 160);

    for bean in &beans {
        let nested = object(bean, "anotherTestBean");
        assert!(field(&nested, "testBean").is_null());
    }
    assert!(generator.cache().is_empty());
}

#[test]
fn threads_share_cached_instances() {
    let generator = Arc::new(bean_generator(true));
    let beans = spawn_requests(&generator, 8, 5);

    let cached = generator.get_instance(TEST_BEAN).expect("cached");
    for bean in &beans {
        assert!(bean.ptr_eq(&cached));
    }
}

use super::*;

cfg_not_loom! {

#[test]
fn st_empty_contract() {
    let (src, mut sink) = queue::<i32>();

    assert!(src.is_empty());
    assert!(sink.is_empty());
    assert_eq!(sink.peek(), None);
    assert_eq!(sink.try_dequeue(), None);
    assert!(!sink.pop());
}

#[test]
fn st_single_element() {
    let (src, mut sink) = queue::<i32>();

    src.enqueue(5);
    assert!(!src.is_empty());
    assert_eq!(sink.peek(), Some(&5));
    assert_eq!(sink.try_dequeue(), Some(5));
    assert!(sink.is_empty());
    assert_eq!(sink.try_dequeue(), None);
}

#[test]
fn st_fifo_order() {
    let (src, mut sink) = queue::<i32>();

    for i in 0..100 {
        src.enqueue(i);
    }
    for i in 0..100 {
        assert_eq!(sink.try_dequeue(), Some(i));
    }
    assert_eq!(sink.try_dequeue(), None);
}

#[test]
fn st_excess_dequeue() {
    let (src, mut sink) = queue::<i32>();

    for i in 0..100 {
        src.enqueue(i);
    }
    for _ in 0..101 {
        sink.try_dequeue();
    }
    assert!(sink.is_empty());
}

#[test]
fn st_pop() {
    let (src, mut sink) = queue::<i32>();

    for i in 0..100 {
        src.enqueue(i);
    }
    for _ in 0..100 {
        assert!(sink.pop());
    }
    assert!(!sink.pop());
    assert!(sink.is_empty());
}

#[test]
fn st_peek_is_idempotent() {
    let (src, mut sink) = queue::<i32>();

    src.enqueue(1);
    src.enqueue(2);
    assert_eq!(sink.peek(), Some(&1));
    assert_eq!(sink.peek(), Some(&1));
    assert_eq!(sink.try_dequeue(), Some(1));
    assert_eq!(sink.peek(), Some(&2));
}

// Depth stays at one, so every enqueue after the first few runs on a
// recycled slot.
#[test]
fn st_shallow_churn() {
    let (src, mut sink) = queue::<u32>();

    for i in 0..10_000 {
        src.enqueue(i);
        assert_eq!(sink.try_dequeue(), Some(i));
    }
    assert!(sink.is_empty());
}

// Depth keeps growing, crossing several chunk boundaries.
#[test]
fn st_deep_growth() {
    let (src, mut sink) = queue::<u32>();

    for i in 0..10_000 {
        src.enqueue(i);
    }
    for i in 0..10_000 {
        assert_eq!(sink.try_dequeue(), Some(i));
    }
    assert_eq!(sink.try_dequeue(), None);
}

// Growth and recycling interleaved.
#[test]
fn st_mixed_churn() {
    let (src, mut sink) = queue::<u32>();

    let mut expected = 0;
    for i in 0..10_000 {
        src.enqueue(i);
        if i % 3 != 0 {
            assert_eq!(sink.try_dequeue(), Some(expected));
            expected += 1;
        }
    }
    while let Some(v) = sink.try_dequeue() {
        assert_eq!(v, expected);
        expected += 1;
    }
    assert_eq!(expected, 10_000);
}

#[test]
fn drop() {
    use std::sync::Arc;
    let arc = Arc::new(());
    {
        let (src, _sink) = queue();
        src.enqueue(arc.clone());
        src.enqueue(arc.clone());
        src.enqueue(arc.clone());
        src.enqueue(arc.clone());
        src.enqueue(arc.clone());
    }
    assert_eq!(Arc::strong_count(&arc), 1);
}

#[test]
fn drop_partially_consumed() {
    use std::rc::Rc;
    let rc = Rc::new(());
    {
        let (src, mut sink) = queue();
        for _ in 0..4 {
            src.enqueue(rc.clone());
        }
        sink.try_dequeue();
        sink.try_dequeue();
    }
    assert_eq!(Rc::strong_count(&rc), 1);
}

#[test]
fn send_non_copy() {
    let (src, mut sink) = queue::<Box<str>>();
    src.enqueue("Hello".to_owned().into_boxed_str());
    assert_eq!(sink.try_dequeue().as_deref(), Some("Hello"));
}

#[test]
fn mt_order() {
    const COUNT: u32 = 100_000;

    let (src, mut sink) = queue::<u32>();
    std::thread::spawn(move || {
        for i in 0..COUNT {
            src.enqueue(i);
        }
    });
    for i in 0..COUNT {
        loop {
            if let Some(v) = sink.try_dequeue() {
                assert_eq!(v, i, "Data should be received in the same order as it was sent.");
                break;
            }
        }
    }
    assert!(sink.is_empty());
}

}

cfg_loom! {
use loom::model::model;
use loom::thread;

#[test]
fn mt_order() {
    model(|| {
        let (src, mut sink) = queue::<u8>();
        thread::spawn(move || {
            for i in 0..3 {
                src.enqueue(i);
            }
        });
        for i in 0..3 {
            loop {
                match sink.try_dequeue() {
                    Some(v) => {
                        assert_eq!(v, i, "Data should be received in the same order as it was sent.");
                        break;
                    }
                    None => thread::yield_now(),
                }
            }
        }
        assert_eq!(sink.try_dequeue(), None);
    });
}

// Exercises the consumer-side tail catch-up: loom explores the
// interleavings where the consumer runs between the producer's link
// and its tail swing, and the dequeue must heal the lag itself.
#[test]
fn mt_lagging_tail() {
    model(|| {
        let (src, mut sink) = queue::<u8>();
        thread::spawn(move || {
            src.enqueue(1);
            src.enqueue(2);
        });
        let mut got = 0;
        while got < 2 {
            match sink.try_dequeue() {
                Some(v) => {
                    got += 1;
                    assert_eq!(v, got);
                }
                None => thread::yield_now(),
            }
        }
    });
}

#[test]
fn mt_peek_during_enqueue() {
    model(|| {
        let (src, sink) = queue::<u8>();
        thread::spawn(move || {
            src.enqueue(7);
        });
        loop {
            match sink.peek() {
                Some(v) => break assert_eq!(*v, 7),
                None => thread::yield_now(),
            }
        }
    });
}

#[test]
fn mt_endpoint_drop() {
    model(|| {
        let (src, sink) = queue::<u8>();
        thread::spawn(move || {
            src.enqueue(1);
            src.enqueue(2);
        });
        // pending values and the Inner are freed no matter which
        // endpoint goes first
        std::mem::drop(sink);
    });
}

}

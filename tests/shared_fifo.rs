//! Concurrency properties of [`SharedFifo`]: blocked readers wake on write,
//! close, error, and seek; aggregate byte counts hold under many producers
//! and consumers.

use bytepipe::{Position, Producer, SharedFifo};
use std::{
    collections::BTreeMap,
    sync::Arc,
    thread,
    time::Duration,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn blocked_read_wakes_when_enough_arrives() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let writer = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            fifo.write(b"ab");
            thread::sleep(Duration::from_millis(10));
            fifo.write(b"cd");
        })
    };

    // Needs both writes before the predicate holds.
    assert_eq!(fifo.read(4), Ok(b"abcd".to_vec()));
    writer.join().unwrap();
}

#[test]
fn blocked_read_wakes_on_close_with_partial_data() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let writer = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            fifo.write(b"ab");
            thread::sleep(Duration::from_millis(20));
            fifo.close();
        })
    };

    // Asked for five, the channel closes with two: the waiter gets the two.
    assert_eq!(fifo.read(5), Ok(b"ab".to_vec()));
    writer.join().unwrap();
}

#[test]
fn blocked_read_wakes_on_close_with_nothing() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let closer = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            fifo.close();
        })
    };

    assert_eq!(fifo.read(1), Ok(Vec::new()));
    assert!(fifo.eof());
    closer.join().unwrap();
}

#[test]
fn blocked_read_wakes_on_error() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let failer = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            fifo.set_error();
        })
    };

    assert!(fifo.read(1).is_err());
    assert!(!fifo.is_readable());
    failer.join().unwrap();
}

#[test]
fn blocked_extract_wakes_when_size_suffices() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let writer = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            fifo.write(b"abc");
        })
    };

    assert_eq!(fifo.extract(3), Ok(b"abc".to_vec()));
    assert!(fifo.is_empty());
    writer.join().unwrap();
}

#[test]
fn blocked_read_wakes_on_seek_rewind() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());
    fifo.write(b"abcde");
    // Leave only two bytes available from the cursor.
    assert_eq!(fifo.read(3), Ok(b"abc".to_vec()));

    let seeker = {
        let fifo = Arc::clone(&fifo);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            fifo.seek(0, Position::Absolute);
        })
    };

    // Four bytes are not available until the rewind raises the count to five.
    assert_eq!(fifo.read(4), Ok(b"abcd".to_vec()));
    seeker.join().unwrap();
}

#[test]
fn extract_signals_other_blocked_consumers() {
    init_logging();
    let fifo = Arc::new(SharedFifo::new());

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let fifo = Arc::clone(&fifo);
            thread::spawn(move || fifo.extract(2))
        })
        .collect();

    thread::sleep(Duration::from_millis(10));
    fifo.write(b"wxyz");

    let mut delivered = Vec::new();
    for consumer in consumers {
        delivered.extend(consumer.join().unwrap().unwrap());
    }
    delivered.sort_unstable();
    assert_eq!(delivered, b"wxyz".to_vec());
}

/// Four producers write 50 copies of a distinct tag each; three consumers
/// extract single bytes until EoF.  No ordering is guaranteed across
/// producers, but the aggregate multiset must balance exactly.
#[test]
fn multi_producer_multi_consumer_preserves_counts() {
    init_logging();
    const TAGS: [u8; 4] = [b'a', b'b', b'c', b'd'];
    const PER_TAG: usize = 50;

    let producer = Producer::new();

    let writers: Vec<_> = TAGS
        .iter()
        .map(|&tag| {
            let producer = producer.clone();
            thread::spawn(move || {
                for _ in 0..PER_TAG {
                    assert!(producer.write(&[tag]));
                    thread::yield_now();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let consumer = producer.consumer();
            thread::spawn(move || {
                let mut received = Vec::new();
                loop {
                    match consumer.extract(1) {
                        Ok(data) if data.is_empty() => {
                            if consumer.eof() {
                                break;
                            }
                        }
                        Ok(data) => received.extend(data),
                        Err(_) => break,
                    }
                }
                received
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    producer.close();

    let mut counts = BTreeMap::new();
    for reader in readers {
        for byte in reader.join().unwrap() {
            *counts.entry(byte).or_insert(0usize) += 1;
        }
    }

    assert_eq!(counts.values().sum::<usize>(), TAGS.len() * PER_TAG);
    for tag in TAGS {
        assert_eq!(counts[&tag], PER_TAG, "tag {tag:?} miscounted");
    }
}

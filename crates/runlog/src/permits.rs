//! Bounded pool of transmission permits.

use parking_lot::{Condvar, Mutex};
use tracing::debug;

/// Counting permit pool with a fixed capacity.
///
/// Permits are handed out as [`TransmitPermit`] values; dropping one returns
/// it to the pool and wakes one waiter. A permit can be moved to another
/// party, which then releases it by dropping it. Because every release is a
/// drop of an acquired permit, the pool can never hold more than its
/// capacity.
#[derive(Debug)]
pub struct PermitPool {
	capacity: usize,
	available: Mutex<usize>,
	released: Condvar,
}

impl PermitPool {
	/// Creates a pool with `capacity` permits. A zero capacity is raised to one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			capacity,
			available: Mutex::new(capacity),
			released: Condvar::new(),
		}
	}

	/// Blocks until a permit is free and takes it.
	pub fn acquire(&self) -> TransmitPermit<'_> {
		let mut available = self.available.lock();
		while *available == 0 {
			self.released.wait(&mut available);
		}
		*available -= 1;
		debug!(available = *available, capacity = self.capacity, "permits.acquire");
		TransmitPermit { pool: self }
	}

	/// Permits currently free.
	pub fn available(&self) -> usize {
		*self.available.lock()
	}

	pub const fn capacity(&self) -> usize {
		self.capacity
	}

	fn release(&self) {
		let mut available = self.available.lock();
		debug_assert!(*available < self.capacity, "permit released into a full pool");
		*available += 1;
		debug!(available = *available, capacity = self.capacity, "permits.release");
		drop(available);
		self.released.notify_one();
	}
}

/// One permit taken from a [`PermitPool`]; released on drop.
#[must_use = "dropping a permit releases it immediately"]
#[derive(Debug)]
pub struct TransmitPermit<'a> {
	pool: &'a PermitPool,
}

impl Drop for TransmitPermit<'_> {
	fn drop(&mut self) {
		self.pool.release();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::mpsc;
	use std::thread;
	use std::time::Duration;

	use super::*;

	#[test]
	fn zero_capacity_is_raised_to_one() {
		let pool = PermitPool::new(0);
		assert_eq!(pool.capacity(), 1);
		assert_eq!(pool.available(), 1);
	}

	#[test]
	fn dropping_permits_returns_them() {
		let pool = PermitPool::new(2);
		let a = pool.acquire();
		let b = pool.acquire();
		assert_eq!(pool.available(), 0);

		drop(a);
		assert_eq!(pool.available(), 1);
		drop(b);
		assert_eq!(pool.available(), 2);
	}

	#[test]
	fn acquire_waits_for_a_release() {
		let pool = Arc::new(PermitPool::new(1));
		let held = pool.acquire();

		let (tx, rx) = mpsc::channel();
		let waiter = {
			let pool = Arc::clone(&pool);
			thread::spawn(move || {
				let _permit = pool.acquire();
				tx.send(()).unwrap();
			})
		};

		assert!(rx.recv_timeout(Duration::from_millis(50)).is_err(), "acquire should block while the pool is empty");
		drop(held);
		rx.recv_timeout(Duration::from_secs(5)).expect("acquire should resume after release");
		waiter.join().unwrap();
		assert_eq!(pool.available(), 1);
	}

	#[test]
	fn holders_never_exceed_capacity() {
		let pool = Arc::new(PermitPool::new(2));
		let holding = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));

		let handles: Vec<_> = (0..6)
			.map(|_| {
				let (pool, holding, peak) = (Arc::clone(&pool), Arc::clone(&holding), Arc::clone(&peak));
				thread::spawn(move || {
					for _ in 0..20 {
						let _permit = pool.acquire();
						let now = holding.fetch_add(1, Ordering::SeqCst) + 1;
						peak.fetch_max(now, Ordering::SeqCst);
						thread::sleep(Duration::from_micros(200));
						holding.fetch_sub(1, Ordering::SeqCst);
					}
				})
			})
			.collect();

		for handle in handles {
			handle.join().unwrap();
		}
		assert!(peak.load(Ordering::SeqCst) <= 2);
		assert_eq!(pool.available(), 2);
	}
}

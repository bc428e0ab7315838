// Copyright 2015-2019 Parity Technologies (UK) Ltd.
// This file is part of Parity Ethereum.

// Parity Ethereum is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Ethereum is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Ethereum.  If not, see <http://www.gnu.org/licenses/>.

//! Block download coordination. `DownloadMan` tracks which block hashes are
//! still wanted across all peers and parcels them out in disjoint batches;
//! each peer handler holds a `Subscription` whose drop returns any
//! undelivered hashes to the pool for reassignment.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use ethereum_types::H256;
use parking_lot::Mutex;

#[derive(Default)]
struct Pool {
	/// Hashes not yet assigned to any subscription, in fetch order.
	pending: VecDeque<H256>,
	/// Hashes currently out with a subscription.
	assigned: HashMap<usize, Vec<H256>>,
	next_id: usize,
}

/// Shared download coordinator.
#[derive(Default)]
pub struct DownloadMan {
	pool: Mutex<Pool>,
}

impl DownloadMan {
	pub fn new() -> DownloadMan {
		DownloadMan::default()
	}

	/// Queue hashes for download. Hashes already pending or assigned are ignored.
	pub fn append_hashes<I>(&self, hashes: I) where I: IntoIterator<Item = H256> {
		let mut pool = self.pool.lock();
		for h in hashes {
			if pool.pending.contains(&h) || pool.assigned.values().any(|v| v.contains(&h)) {
				continue;
			}
			pool.pending.push_back(h);
		}
	}

	/// Forget all outstanding work.
	pub fn reset(&self) {
		let mut pool = self.pool.lock();
		pool.pending.clear();
		pool.assigned.clear();
	}

	/// True when no hash is waiting to be fetched or out with a peer.
	pub fn is_empty(&self) -> bool {
		let pool = self.pool.lock();
		pool.pending.is_empty() && pool.assigned.values().all(|v| v.is_empty())
	}

	/// Number of hashes waiting to be assigned.
	pub fn pending_count(&self) -> usize {
		self.pool.lock().pending.len()
	}

	fn register(&self) -> usize {
		let mut pool = self.pool.lock();
		let id = pool.next_id;
		pool.next_id += 1;
		id
	}

	fn release(&self, id: usize) {
		let mut pool = self.pool.lock();
		if let Some(assigned) = pool.assigned.remove(&id) {
			for h in assigned.into_iter().rev() {
				pool.pending.push_front(h);
			}
		}
	}
}

/// Scoped handle into the download coordinator. Created per peer handler;
/// dropping it reassigns any hashes still out with the peer.
pub struct Subscription {
	man: Arc<DownloadMan>,
	id: usize,
}

impl Subscription {
	pub fn new(man: Arc<DownloadMan>) -> Subscription {
		let id = man.register();
		Subscription { man, id }
	}

	/// Take the next batch of up to `n` hashes. Hashes previously handed to
	/// this subscription and not yet retired are re-issued first.
	pub fn next_fetch(&self, n: usize) -> Vec<H256> {
		let mut pool = self.man.pool.lock();
		let mut batch = pool.assigned.remove(&self.id).unwrap_or_default();
		if batch.len() > n {
			for h in batch.split_off(n).into_iter().rev() {
				pool.pending.push_front(h);
			}
		}
		while batch.len() < n {
			match pool.pending.pop_front() {
				Some(h) => batch.push(h),
				None => break,
			}
		}
		pool.assigned.insert(self.id, batch.clone());
		batch
	}

	/// Retire hashes that have been delivered and imported.
	pub fn note_done(&self, done: &[H256]) {
		let mut pool = self.man.pool.lock();
		if let Some(assigned) = pool.assigned.get_mut(&self.id) {
			assigned.retain(|h| !done.contains(h));
		}
	}

	/// The coordinator this subscription draws from.
	pub fn man(&self) -> &Arc<DownloadMan> {
		&self.man
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.man.release(self.id);
	}
}

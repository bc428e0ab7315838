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

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use ethereum_types::{H256, U256};
use hash::keccak;
use parking_lot::RwLock;
use rlp::{Rlp, RlpStream};

use api::SyncHost;
use chain::SyncPeer;
use client::{BlockChainClient, BlockChainInfo, BlockDetails, BlockNumber};
use network::{DisconnectReason, Error, PacketId, PeerId};
use reputation::{MemoryReputation, ReputationManager};
use sync_io::SyncIo;

/// In-memory chain of generated dummy blocks.
pub struct TestChain {
	pub blocks: RwLock<HashMap<H256, Bytes>>,
	pub numbers: RwLock<Vec<H256>>,
	pub details: RwLock<HashMap<H256, BlockDetails>>,
}

impl TestChain {
	/// Creates a chain holding just the genesis block.
	pub fn new() -> TestChain {
		let chain = TestChain {
			blocks: RwLock::new(HashMap::new()),
			numbers: RwLock::new(Vec::new()),
			details: RwLock::new(HashMap::new()),
		};
		chain.add_block(Vec::new());
		chain
	}

	pub fn add_blocks(&self, count: usize) {
		for _ in 0..count {
			self.add_block(Vec::new());
		}
	}

	/// Appends one block carrying the given extra payload, so tests can
	/// control block sizes.
	pub fn add_block(&self, extra: Bytes) -> H256 {
		let number = self.numbers.read().len() as BlockNumber;
		let parent = self.numbers.read().last().cloned().unwrap_or_else(H256::zero);
		let mut rlp = RlpStream::new_list(3);
		rlp.append(&number);
		rlp.append(&parent);
		rlp.append(&extra);
		let bytes = rlp.out();
		let hash = keccak(&bytes);
		let parent_td = self.details.read().get(&parent).map_or_else(U256::zero, |d| d.total_difficulty);
		self.details.write().insert(hash, BlockDetails {
			number,
			total_difficulty: parent_td + U256::from(100),
			parent,
		});
		self.blocks.write().insert(hash, bytes);
		self.numbers.write().push(hash);
		hash
	}

	pub fn block_hash_at(&self, number: BlockNumber) -> H256 {
		self.numbers.read()[number as usize]
	}
}

impl BlockChainClient for TestChain {
	fn chain_info(&self) -> BlockChainInfo {
		let numbers = self.numbers.read();
		let best = *numbers.last().expect("chain is created with a genesis block");
		BlockChainInfo {
			total_difficulty: self.details.read()[&best].total_difficulty,
			best_block_hash: best,
			best_block_number: numbers.len() as BlockNumber - 1,
			genesis_hash: numbers[0],
		}
	}

	fn block_hash(&self, number: BlockNumber) -> Option<H256> {
		self.numbers.read().get(number as usize).cloned()
	}

	fn block(&self, hash: &H256) -> Option<Bytes> {
		self.blocks.read().get(hash).cloned()
	}

	fn block_details(&self, hash: &H256) -> Option<BlockDetails> {
		self.details.read().get(hash).cloned()
	}
}

pub struct TestPacket {
	pub data: Bytes,
	pub packet_id: PacketId,
}

/// Session transport double that records everything the handler does.
pub struct TestIo {
	pub chain: Arc<TestChain>,
	pub reputation: Arc<MemoryReputation>,
	pub queue: VecDeque<TestPacket>,
	pub notes: HashMap<String, String>,
	pub disconnected: Option<DisconnectReason>,
	pub rating: i32,
	pub sender: PeerId,
}

impl TestIo {
	pub fn new(chain: Arc<TestChain>, reputation: Arc<MemoryReputation>, sender: PeerId) -> TestIo {
		TestIo {
			chain,
			reputation,
			queue: VecDeque::new(),
			notes: HashMap::new(),
			disconnected: None,
			rating: 0,
			sender,
		}
	}
}

impl SyncIo for TestIo {
	fn disconnect(&mut self, reason: DisconnectReason) {
		self.disconnected = Some(reason);
	}

	fn respond(&mut self, packet_id: PacketId, data: Vec<u8>) -> Result<(), Error> {
		self.queue.push_back(TestPacket { data, packet_id });
		Ok(())
	}

	fn send(&mut self, packet_id: PacketId, data: Vec<u8>) -> Result<(), Error> {
		self.queue.push_back(TestPacket { data, packet_id });
		Ok(())
	}

	fn add_note(&mut self, key: &str, value: &str) {
		self.notes.insert(key.into(), value.into());
	}

	fn add_rating(&mut self, delta: i32) {
		self.rating += delta;
	}

	fn chain(&self) -> &dyn BlockChainClient {
		&*self.chain
	}

	fn reputation(&self) -> &dyn ReputationManager {
		&*self.reputation
	}

	fn peer_id(&self) -> PeerId {
		self.sender
	}
}

/// Host double that records upcalls and, like a real host, parks the peer
/// once a solicited reply has been consumed.
#[derive(Default)]
pub struct TestHost {
	pub status_calls: usize,
	pub transactions: usize,
	pub hashes: Vec<Vec<H256>>,
	pub blocks: Vec<usize>,
	pub new_blocks: usize,
	pub new_hashes: Vec<Vec<H256>>,
	pub aborted: usize,
}

impl SyncHost for TestHost {
	fn on_peer_status(&mut self, _peer: &mut SyncPeer, _io: &mut dyn SyncIo) {
		self.status_calls += 1;
	}

	fn on_peer_transactions(&mut self, _peer: &mut SyncPeer, _io: &mut dyn SyncIo, r: &Rlp) {
		self.transactions += r.item_count().unwrap_or(0);
	}

	fn on_peer_hashes(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, hashes: Vec<H256>) {
		self.hashes.push(hashes);
		peer.set_idle(io);
	}

	fn on_peer_blocks(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, r: &Rlp) {
		self.blocks.push(r.item_count().unwrap_or(0));
		peer.set_idle(io);
	}

	fn on_peer_new_block(&mut self, _peer: &mut SyncPeer, _io: &mut dyn SyncIo, _r: &Rlp) {
		self.new_blocks += 1;
	}

	fn on_peer_new_hashes(&mut self, _peer: &mut SyncPeer, _io: &mut dyn SyncIo, hashes: Vec<H256>) {
		self.new_hashes.push(hashes);
	}

	fn on_peer_aborting(&mut self, _peer: &mut SyncPeer, _io: &mut dyn SyncIo) {
		self.aborted += 1;
	}
}

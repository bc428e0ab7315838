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

//! Read-only view of the canonical chain as consumed by the sync handler.

use bytes::Bytes;
use ethereum_types::{H256, U256};

/// Block height within the canonical chain.
pub type BlockNumber = u64;

/// Summary of the chain head.
#[derive(Clone, Debug)]
pub struct BlockChainInfo {
	/// Cumulative difficulty of the best chain.
	pub total_difficulty: U256,
	/// Best block hash.
	pub best_block_hash: H256,
	/// Best block number.
	pub best_block_number: BlockNumber,
	/// Genesis block hash.
	pub genesis_hash: H256,
}

/// Familial details of a single block.
#[derive(Clone, Debug)]
pub struct BlockDetails {
	/// Block number.
	pub number: BlockNumber,
	/// Cumulative difficulty up to and including this block.
	pub total_difficulty: U256,
	/// Parent block hash.
	pub parent: H256,
}

/// Blockchain database client. Lookups by number and by hash are O(1);
/// `block_details` is constant time for any stored block.
pub trait BlockChainClient: Send + Sync {
	/// Get blockchain information.
	fn chain_info(&self) -> BlockChainInfo;

	/// Get the hash of the canonical block at the given height.
	fn block_hash(&self, number: BlockNumber) -> Option<H256>;

	/// Get raw block data.
	fn block(&self, hash: &H256) -> Option<Bytes>;

	/// Get familial details concerning a block.
	fn block_details(&self, hash: &H256) -> Option<BlockDetails>;

	/// Whether the block is part of the known chain.
	fn is_known(&self, hash: &H256) -> bool {
		self.block_details(hash).is_some()
	}
}

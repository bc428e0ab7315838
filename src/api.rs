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

use ethereum_types::H256;
use rlp::Rlp;

use chain::SyncPeer;
use network::ProtocolId;
use sync_io::SyncIo;

/// Sync subprotocol name.
pub const ETH_PROTOCOL: ProtocolId = *b"eth";

/// 61 version of the protocol and the packet count.
pub const ETH_PROTOCOL_VERSION_61: (u8, u8) = (61, 0x0a);
/// 60 version of the protocol and the packet count.
pub const ETH_PROTOCOL_VERSION_60: (u8, u8) = (60, 0x0a);

/// Configuration carried by the host for each peer handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
	/// Network ID to advertise in the handshake.
	pub network_id: u64,
	/// Default number of blocks to request per `GetBlocks`, before any
	/// per-peer override from the reputation store.
	pub max_blocks_ask: usize,
	/// Number of hashes to request per `GetBlockHashes`.
	pub max_hashes_ask: usize,
	/// Cap on the number of blocks served in a single `Blocks` reply.
	pub max_blocks_to_send: usize,
	/// Cap on the byte size of a single `Blocks` reply.
	pub max_payload_size: usize,
}

impl Default for SyncConfig {
	fn default() -> SyncConfig {
		SyncConfig {
			network_id: 1,
			max_blocks_ask: 32,
			max_hashes_ask: 256,
			max_blocks_to_send: 1024,
			max_payload_size: 256 * 1024,
		}
	}
}

/// Host capability registry as seen from a peer handler. The host owns the
/// handlers; a handler never holds a reference back, it is handed the host
/// for the duration of a dispatch. Upcalls may drive the handler's next
/// transition (`set_idle`, a follow-up request) but must not recursively
/// dispatch packets into the same handler.
pub trait SyncHost {
	/// Peer completed the handshake.
	fn on_peer_status(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo);
	/// Peer sent transaction gossip. Payload is the raw transaction list.
	fn on_peer_transactions(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, r: &Rlp);
	/// Peer answered our hash request. An empty list means "no more hashes".
	fn on_peer_hashes(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, hashes: Vec<H256>);
	/// Peer answered our block request. Payload is the raw block list.
	fn on_peer_blocks(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, r: &Rlp);
	/// Peer announced a newly mined block. Payload is `[block, total_difficulty]`.
	fn on_peer_new_block(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, r: &Rlp);
	/// Peer announced hashes of new blocks it has.
	fn on_peer_new_hashes(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo, hashes: Vec<H256>);
	/// Session is closing; outstanding work is being reassigned.
	fn on_peer_aborting(&mut self, peer: &mut SyncPeer, io: &mut dyn SyncIo);
}

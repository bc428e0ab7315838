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

use bytes::Bytes;
use ethereum_types::H256;
use rlp::RlpStream;

use api::{ETH_PROTOCOL_VERSION_60, ETH_PROTOCOL_VERSION_61};
use client::BlockNumber;
use network::{DisconnectReason, PacketId};
use sync_io::SyncIo;

use super::sync_packet::SyncPacket::{
	GetBlockHashesByNumberPacket,
	GetBlockHashesPacket,
	GetBlocksPacket,
	StatusPacket,
};

use super::{PeerAsking, SyncPeer};

/// The sync requester: builds and sends the outbound question packets.
/// At most one question is outstanding per peer at any time.
pub struct SyncRequester;

impl SyncRequester {
	/// Send the handshake. Issued exactly once, right after the session opens.
	pub fn request_status(peer: &mut SyncPeer, io: &mut dyn SyncIo) {
		debug_assert!(peer.asking == PeerAsking::Nothing);
		peer.require_transactions = true;
		let chain = io.chain().chain_info();
		// A peer registered under the current version gets the head-number
		// extension; everyone else gets the legacy five fields.
		let latest = peer.peer_capability_version == ETH_PROTOCOL_VERSION_61.0;
		let version = if latest { ETH_PROTOCOL_VERSION_61.0 } else { ETH_PROTOCOL_VERSION_60.0 };
		trace!(target: "sync", "{} <- Status (protocol: {})", io.peer_id(), version);
		let mut packet = RlpStream::new_list(if latest { 6 } else { 5 });
		packet.append(&(version as u32));
		packet.append(&peer.config.network_id);
		packet.append(&chain.total_difficulty);
		packet.append(&chain.best_block_hash);
		packet.append(&chain.genesis_hash);
		if latest {
			packet.append(&chain.best_block_number);
		}
		SyncRequester::send_request(peer, io, PeerAsking::State, StatusPacket.id(), packet.out());
	}

	/// Request a run of block hashes anchored at a height.
	pub fn request_hashes_by_number(peer: &mut SyncPeer, io: &mut dyn SyncIo, number: BlockNumber, count: usize) {
		debug_assert!(peer.asking == PeerAsking::Nothing);
		peer.sync_hash_number = number;
		peer.sync_hash = H256::zero();
		trace!(target: "sync", "{} <- GetBlockHashesByNumber: {} entries from {}", io.peer_id(), count, number);
		let mut rlp = RlpStream::new_list(2);
		rlp.append(&number);
		rlp.append(&count);
		SyncRequester::send_request(peer, io, PeerAsking::Hashes, GetBlockHashesByNumberPacket.id(), rlp.out());
	}

	/// Request block hashes anchored at a known hash, walking toward genesis.
	/// Legacy peers only understand this form.
	pub fn request_hashes(peer: &mut SyncPeer, io: &mut dyn SyncIo, h: &H256) {
		debug_assert!(peer.asking == PeerAsking::Nothing);
		peer.sync_hash = *h;
		peer.sync_hash_number = 0;
		trace!(target: "sync", "{} <- GetBlockHashes: starting from {}", io.peer_id(), h);
		let mut rlp = RlpStream::new_list(2);
		rlp.append(h);
		rlp.append(&peer.config.max_hashes_ask);
		SyncRequester::send_request(peer, io, PeerAsking::Hashes, GetBlockHashesPacket.id(), rlp.out());
	}

	/// Request the next batch of blocks from the download coordinator, capped
	/// at the peer's ask override. An empty batch sends nothing and drops the
	/// peer straight back to idle.
	pub fn request_blocks(peer: &mut SyncPeer, io: &mut dyn SyncIo) {
		debug_assert!(peer.asking == PeerAsking::Nothing);
		let ask = peer.ask_override(io);
		let blocks = peer.sub.next_fetch(ask);
		if blocks.is_empty() {
			trace!(target: "sync", "{}: No blocks to fetch", io.peer_id());
			peer.set_idle(io);
			return;
		}
		trace!(target: "sync", "{} <- GetBlocks: {} entries starting from {:?}", io.peer_id(), blocks.len(), blocks.first());
		let mut rlp = RlpStream::new_list(blocks.len());
		for h in &blocks {
			rlp.append(h);
		}
		SyncRequester::send_request(peer, io, PeerAsking::Blocks, GetBlocksPacket.id(), rlp.out());
	}

	/// Generic request sender. The asking state is set immediately before the
	/// bytes are handed to the transport so `last_ask_time` reflects the
	/// moment the question leaves.
	fn send_request(peer: &mut SyncPeer, io: &mut dyn SyncIo, asking: PeerAsking, packet_id: PacketId, packet: Bytes) {
		if peer.asking != PeerAsking::Nothing {
			warn!(target: "sync", "{}: Asking {} while requesting {}", io.peer_id(), peer.asking, asking);
		}
		peer.set_asking(io, asking);
		if let Err(e) = io.send(packet_id, packet) {
			debug!(target: "sync", "{}: Error sending request: {}", io.peer_id(), e);
			io.disconnect(DisconnectReason::TCPError);
		}
	}
}

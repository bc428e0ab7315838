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
use ethereum_types::{H256, U256};
use rlp::RlpStream;

use network::PacketId;
use sync_io::SyncIo;

use super::sync_packet::SyncPacket::{
	NewBlockHashesPacket,
	NewBlockPacket,
	TransactionsPacket,
};

use super::SyncPeer;

/// The sync propagator: sends unsolicited gossip to the peer. Gossip never
/// touches the asking state, it rides alongside the request conversation.
pub struct SyncPropagator;

impl SyncPropagator {
	/// Announce a newly sealed block, framed as `[block, total_difficulty]`.
	pub fn propagate_new_block(io: &mut dyn SyncIo, block: &[u8], total_difficulty: U256) {
		trace!(target: "sync", "{} <- NewBlock", io.peer_id());
		let mut rlp = RlpStream::new_list(2);
		rlp.append_raw(block, 1);
		rlp.append(&total_difficulty);
		SyncPropagator::send_packet(io, NewBlockPacket.id(), rlp.out());
	}

	/// Announce hashes of blocks the peer is believed to lack.
	pub fn propagate_new_hashes(io: &mut dyn SyncIo, hashes: &[H256]) {
		trace!(target: "sync", "{} <- NewHashes ({} entries)", io.peer_id(), hashes.len());
		let mut rlp = RlpStream::new_list(hashes.len());
		for h in hashes {
			rlp.append(h);
		}
		SyncPropagator::send_packet(io, NewBlockHashesPacket.id(), rlp.out());
	}

	/// Relay pre-encoded transactions to a peer that asked for them in its
	/// handshake. Peers that did not are skipped.
	pub fn propagate_transactions(peer: &SyncPeer, io: &mut dyn SyncIo, transactions: &[Bytes]) {
		if !peer.require_transactions {
			return;
		}
		trace!(target: "sync", "{} <- Transactions ({} entries)", io.peer_id(), transactions.len());
		let mut rlp = RlpStream::new_list(transactions.len());
		for tx in transactions {
			rlp.append_raw(tx, 1);
		}
		SyncPropagator::send_packet(io, TransactionsPacket.id(), rlp.out());
	}

	fn send_packet(io: &mut dyn SyncIo, packet_id: PacketId, packet: Bytes) {
		if let Err(e) = io.send(packet_id, packet) {
			debug!(target: "sync", "{}: Error sending packet: {}", io.peer_id(), e);
		}
	}
}

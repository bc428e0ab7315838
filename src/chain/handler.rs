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

use api::{SyncHost, ETH_PROTOCOL, ETH_PROTOCOL_VERSION_60, ETH_PROTOCOL_VERSION_61};
use sync_io::SyncIo;

use super::{
	PacketDecodeError,
	PeerAsking,
	SyncPeer,
	SyncRequester,
};

/// The sync handler: handles replies and gossip from the remote and the
/// session lifecycle events around them.
pub struct SyncHandler;

impl SyncHandler {
	/// Called when the session opens. Notes the peer's manners from the
	/// reputation store and starts the handshake.
	pub fn on_peer_connected(peer: &mut SyncPeer, io: &mut dyn SyncIo) {
		trace!(target: "sync", "== Connected {}", io.peer_id());
		let manners = if io.reputation().is_rude(io.peer_id(), ETH_PROTOCOL) { "RUDE" } else { "nice" };
		io.add_note("manners", manners);
		SyncRequester::request_status(peer, io);
	}

	/// Called when the session is closing. A peer that leaves while being
	/// asked for something is rude; either way the host is told so the
	/// download coordinator can reassign any outstanding hashes.
	pub fn on_peer_aborting(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost) {
		if peer.asking != PeerAsking::Nothing {
			debug!(target: "sync", "{}: Peer aborting while being asked for {}", io.peer_id(), peer.asking);
			peer.set_rude(io);
		}
		host.on_peer_aborting(peer, io);
	}

	/// Called by peer to report its chain status. The handshake reply is
	/// unconditional: it resets `asking` whatever was outstanding.
	pub fn on_peer_status(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		peer.protocol_version = r.val_at(0)?;
		peer.network_id = r.val_at(1)?;
		peer.difficulty = r.val_at(2)?;
		peer.latest_hash = r.val_at(3)?;
		peer.genesis = r.val_at(4)?;
		if peer.peer_capability_version == ETH_PROTOCOL_VERSION_61.0 {
			if r.item_count()? != 6 {
				debug!(target: "sync", "{}: Peer does not support the status head-number extension", io.peer_id());
				peer.protocol_version = ETH_PROTOCOL_VERSION_60.0;
			} else {
				peer.protocol_version = ETH_PROTOCOL_VERSION_61.0;
				peer.latest_number = r.val_at(5)?;
			}
		}
		trace!(target: "sync", "{} -> Status (protocol: {}, network: {}, difficulty: {}, latest: {}, genesis: {})",
			io.peer_id(), peer.protocol_version, peer.network_id, peer.difficulty, peer.latest_hash, peer.genesis);

		peer.set_idle(io);
		host.on_peer_status(peer, io);
		Ok(())
	}

	/// Called when the peer sends us a batch of transactions. Unsolicited
	/// gossip, accepted in any state.
	pub fn on_peer_transactions(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		trace!(target: "sync", "{} -> Transactions ({} entries)", io.peer_id(), r.item_count()?);
		host.on_peer_transactions(peer, io, r);
		Ok(())
	}

	/// Called by peer once it has a batch of block hashes for us. The host
	/// decides the next transition, typically into a block request or back
	/// to idle once an empty batch signals the end of the chain.
	pub fn on_peer_block_hashes(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		if peer.asking != PeerAsking::Hashes {
			debug!(target: "sync", "{}: Peer giving us hashes when we didn't ask for them", io.peer_id());
			return Ok(());
		}
		let item_count = r.item_count()?;
		trace!(target: "sync", "{} -> BlockHashes ({} entries){}", io.peer_id(), item_count, if item_count == 0 { ": no more hashes" } else { "" });
		let mut hashes = Vec::with_capacity(item_count);
		for i in 0..item_count {
			hashes.push(r.val_at::<H256>(i)?);
		}
		host.on_peer_hashes(peer, io, hashes);
		Ok(())
	}

	/// Called by peer once it has a batch of blocks for us.
	pub fn on_peer_blocks(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		if peer.asking != PeerAsking::Blocks {
			debug!(target: "sync", "{}: Peer giving us blocks when we didn't ask for them", io.peer_id());
			return Ok(());
		}
		trace!(target: "sync", "{} -> Blocks ({} entries)", io.peer_id(), r.item_count()?);
		host.on_peer_blocks(peer, io, r);
		Ok(())
	}

	/// Called when the peer announces a newly mined block.
	pub fn on_peer_new_block(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		trace!(target: "sync", "{} -> NewBlock", io.peer_id());
		host.on_peer_new_block(peer, io, r);
		Ok(())
	}

	/// Called when the peer announces hashes of blocks it thinks we lack.
	pub fn on_peer_new_hashes(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, r: &Rlp) -> Result<(), PacketDecodeError> {
		let item_count = r.item_count()?;
		trace!(target: "sync", "{} -> NewHashes ({} entries)", io.peer_id(), item_count);
		let mut hashes = Vec::with_capacity(item_count);
		for i in 0..item_count {
			hashes.push(r.val_at::<H256>(i)?);
		}
		host.on_peer_new_hashes(peer, io, hashes);
		Ok(())
	}
}

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

use std::cmp;

use bytes::Bytes;
use enum_primitive::FromPrimitive;
use ethereum_types::H256;
use rlp::{Rlp, RlpStream};

use api::SyncHost;
use client::BlockNumber;
use network;
use sync_io::SyncIo;

use super::sync_packet::SyncPacket;
use super::sync_packet::SyncPacket::{
	BlockHashesPacket,
	BlocksPacket,
	GetBlockHashesByNumberPacket,
	GetBlockHashesPacket,
	GetBlocksPacket,
	NewBlockHashesPacket,
	NewBlockPacket,
	StatusPacket,
	TransactionsPacket,
};

use super::{
	RlpResponseResult,
	SyncHandler,
	SyncPeer,
};

/// The sync supplier: single entry point for inbound packets. Questions from
/// the remote are answered with local chain data, replies and gossip are
/// handed to the `SyncHandler`.
pub struct SyncSupplier;

impl SyncSupplier {
	/// Dispatch an inbound packet. Returns `false` when the id does not
	/// belong to this subprotocol so an outer dispatcher can try the next
	/// capability; a recognised id returns `true` whether or not the payload
	/// was well formed. Decode failures are logged and swallowed, the
	/// idle timeout remains the only hard failure path.
	pub fn dispatch_packet(peer: &mut SyncPeer, io: &mut dyn SyncIo, host: &mut dyn SyncHost, packet_id: u8, data: &[u8]) -> bool {
		let rlp = Rlp::new(data);
		let id = match SyncPacket::from_u8(packet_id) {
			Some(id) => id,
			None => {
				debug!(target: "sync", "{}: Unknown packet {:#x}", io.peer_id(), packet_id);
				return false;
			}
		};

		let result = match id {
			GetBlockHashesPacket => SyncSupplier::return_rlp(
				peer, io, &rlp,
				SyncSupplier::return_block_hashes,
				|e| format!("Error sending block hashes: {}", e)),

			GetBlockHashesByNumberPacket => SyncSupplier::return_rlp(
				peer, io, &rlp,
				SyncSupplier::return_block_hashes_by_number,
				|e| format!("Error sending block hashes: {}", e)),

			GetBlocksPacket => SyncSupplier::return_rlp(
				peer, io, &rlp,
				SyncSupplier::return_blocks,
				|e| format!("Error sending blocks: {}", e)),

			StatusPacket => SyncHandler::on_peer_status(peer, io, host, &rlp),
			TransactionsPacket => SyncHandler::on_peer_transactions(peer, io, host, &rlp),
			BlockHashesPacket => SyncHandler::on_peer_block_hashes(peer, io, host, &rlp),
			BlocksPacket => SyncHandler::on_peer_blocks(peer, io, host, &rlp),
			NewBlockPacket => SyncHandler::on_peer_new_block(peer, io, host, &rlp),
			NewBlockHashesPacket => SyncHandler::on_peer_new_hashes(peer, io, host, &rlp),
		};

		if let Err(e) = result {
			debug!(target: "sync", "{} -> Malformed packet {:#x}: {}", io.peer_id(), packet_id, e);
		}
		true
	}

	/// Respond to a GetBlockHashes request: up to `limit` ancestors of the
	/// anchor hash, walking parent pointers away from it. An unknown anchor
	/// has no ancestors to offer.
	fn return_block_hashes(_peer: &SyncPeer, io: &mut dyn SyncIo, r: &Rlp) -> RlpResponseResult {
		let later: H256 = r.val_at(0)?;
		let limit: usize = r.val_at(1)?;
		trace!(target: "sync", "{} -> GetBlockHashes ({} entries, {})", io.peer_id(), limit, later);

		let (depth, mut parent) = match io.chain().block_details(&later) {
			Some(details) => (details.number as usize, details.parent),
			None => (0, H256::zero()),
		};
		let count = cmp::min(limit, depth);
		let mut hashes = Vec::with_capacity(count);
		while hashes.len() < count && !parent.is_zero() {
			hashes.push(parent);
			parent = match io.chain().block_details(&parent) {
				Some(details) => details.parent,
				None => break,
			};
		}

		let mut rlp = RlpStream::new_list(hashes.len());
		for h in &hashes {
			rlp.append(h);
		}
		trace!(target: "sync", "{} <- BlockHashes: returned {} entries", io.peer_id(), hashes.len());
		io.add_rating(0);
		Ok(Some((BlockHashesPacket.id(), rlp)))
	}

	/// Respond to a GetBlockHashesByNumber request: canonical hashes at
	/// consecutive heights starting from the anchor. A start beyond our head
	/// gets an empty reply.
	fn return_block_hashes_by_number(_peer: &SyncPeer, io: &mut dyn SyncIo, r: &Rlp) -> RlpResponseResult {
		let number: BlockNumber = r.val_at(0)?;
		let limit: usize = r.val_at(1)?;
		trace!(target: "sync", "{} -> GetBlockHashesByNumber ({} entries from {})", io.peer_id(), limit, number);

		let head = io.chain().chain_info().best_block_number;
		let mut hashes = Vec::new();
		if number <= head {
			let count = cmp::min((head - number + 1) as usize, limit);
			for n in number..number + count as BlockNumber {
				if let Some(h) = io.chain().block_hash(n) {
					hashes.push(h);
				}
			}
		}

		let mut rlp = RlpStream::new_list(hashes.len());
		for h in &hashes {
			rlp.append(h);
		}
		trace!(target: "sync", "{} <- BlockHashes: returned {} entries", io.peer_id(), hashes.len());
		io.add_rating(0);
		Ok(Some((BlockHashesPacket.id(), rlp)))
	}

	/// Respond to a GetBlocks request with raw block data, stopping before
	/// the block count or payload byte cap would be exceeded. A zero-entry
	/// request costs the remote some rating and gets no reply at all.
	fn return_blocks(peer: &SyncPeer, io: &mut dyn SyncIo, r: &Rlp) -> RlpResponseResult {
		let count = r.item_count()?;
		trace!(target: "sync", "{} -> GetBlocks ({} entries)", io.peer_id(), count);
		if count == 0 {
			debug!(target: "sync", "{}: Zero-entry GetBlocks, not replying", io.peer_id());
			io.add_rating(-10);
			return Ok(None);
		}

		let limit = cmp::min(count, peer.config.max_blocks_to_send);
		let mut added = 0usize;
		let mut data = Bytes::new();
		for i in 0..limit {
			let hash: H256 = r.val_at(i)?;
			if let Some(mut block) = io.chain().block(&hash) {
				// whole blocks only; stop before the cap is breached
				if data.len() + block.len() > peer.config.max_payload_size {
					break;
				}
				data.append(&mut block);
				added += 1;
			}
		}
		if count > 20 && added == 0 {
			debug!(target: "sync", "{}: All {} requested blocks unknown, peer on a different chain?", io.peer_id(), count);
		} else {
			trace!(target: "sync", "{} <- Blocks: {} known and returned, {} unknown, {} ignored", io.peer_id(), added, limit - added, count - limit);
		}

		io.add_rating(0);
		let mut rlp = RlpStream::new_list(added);
		rlp.append_raw(&data, added);
		Ok(Some((BlocksPacket.id(), rlp)))
	}

	fn return_rlp<FRlp, FError>(peer: &SyncPeer, io: &mut dyn SyncIo, rlp: &Rlp, rlp_func: FRlp, error_func: FError) -> Result<(), super::PacketDecodeError>
		where FRlp: Fn(&SyncPeer, &mut dyn SyncIo, &Rlp) -> RlpResponseResult,
			FError: FnOnce(network::Error) -> String
	{
		let response = rlp_func(peer, io, rlp);
		match response {
			Err(e) => Err(e),
			Ok(Some((packet_id, rlp_stream))) => {
				io.respond(packet_id, rlp_stream.out()).unwrap_or_else(
					|e| debug!(target: "sync", "{}", error_func(e)));
				Ok(())
			}
			_ => Ok(())
		}
	}
}

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

//! Per-peer chain synchronization handler.
//!
//! One `SyncPeer` exists for every connected remote and mediates the
//! request/response conversation with it: discovering the remote's chain
//! through `GetBlockHashes`/`GetBlockHashesByNumber`, downloading its blocks
//! through `GetBlocks`, serving the inverse queries against the local chain
//! and forwarding gossip upward to the host.
//!
//! The conversation is strictly half-duplex from our side. `asking` records
//! which reply the handler is waiting for (`State` for the handshake,
//! `Hashes`, `Blocks`, or `Nothing` when idle) and only the matching reply
//! is treated as solicited; anything else is an impoliteness that is logged
//! and dropped without touching the state. A request that stays unanswered
//! for `ASK_TIMEOUT` terminates the session, there is no partial-progress
//! grace.
//!
//! Peers that time out or abort mid-request are flagged as rude in the
//! reputation store and their per-peer block batch size (the "ask override")
//! is halved, so a slow peer is asked for less and less until it either
//! keeps up or stops being used.

pub mod sync_packet;

mod handler;
mod propagator;
mod requester;
mod supplier;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ethereum_types::{H256, U256};
use rlp::{DecoderError, Rlp, RlpStream};

use api::{SyncConfig, ETH_PROTOCOL, ETH_PROTOCOL_VERSION_60};
use client::BlockNumber;
use download::{DownloadMan, Subscription};
use network::{DisconnectReason, PacketId};
use sync_io::SyncIo;

pub use self::handler::SyncHandler;
pub use self::propagator::SyncPropagator;
pub use self::requester::SyncRequester;
pub use self::supplier::SyncSupplier;

pub type PacketDecodeError = DecoderError;
pub type RlpResponseResult = Result<Option<(PacketId, RlpStream)>, PacketDecodeError>;

/// How long an outstanding request may stay unanswered.
const ASK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(PartialEq, Eq, Debug, Clone)]
/// Reply class the handler is currently waiting for.
pub enum PeerAsking {
	Nothing,
	State,
	Hashes,
	Blocks,
}

impl fmt::Display for PeerAsking {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match *self {
			PeerAsking::Nothing => "nothing",
			PeerAsking::State => "state",
			PeerAsking::Hashes => "hashes",
			PeerAsking::Blocks => "blocks",
		})
	}
}

/// Per-peer protocol handler state. Owned by the host for the lifetime of
/// the session and mutated only on the session's packet and timer paths.
pub struct SyncPeer {
	/// Reply class currently outstanding.
	pub(crate) asking: PeerAsking,
	/// Instant of the last transition to a non-idle asking state.
	pub(crate) last_ask_time: Instant,
	/// Protocol version the peer advertised when the capability was registered.
	pub(crate) peer_capability_version: u8,
	/// Effective protocol version, possibly downgraded on `Status` receipt.
	pub(crate) protocol_version: u8,
	/// Peer network id.
	pub(crate) network_id: u64,
	/// Peer chain genesis hash.
	pub(crate) genesis: H256,
	/// Peer best block hash.
	pub(crate) latest_hash: H256,
	/// Peer best block number, if the peer speaks the current protocol.
	pub(crate) latest_number: BlockNumber,
	/// Peer total difficulty.
	pub(crate) difficulty: U256,
	/// Anchor hash of the outstanding hash request, zero when number-anchored.
	pub(crate) sync_hash: H256,
	/// Anchor number of the outstanding hash request, zero when hash-anchored.
	pub(crate) sync_hash_number: BlockNumber,
	/// Whether the peer should be sent transaction gossip.
	pub(crate) require_transactions: bool,
	/// Handle into the download coordinator; dropped with the handler so
	/// outstanding hashes are reassigned on every exit path.
	pub(crate) sub: Subscription,
	/// Host configuration.
	pub(crate) config: SyncConfig,
}

impl SyncPeer {
	/// Create a handler for a freshly connected peer. The caller follows up
	/// with `SyncHandler::on_peer_connected` to start the handshake.
	pub fn new(config: SyncConfig, download: &Arc<DownloadMan>, io: &dyn SyncIo, peer_capability_version: u8) -> SyncPeer {
		SyncPeer {
			asking: PeerAsking::Nothing,
			last_ask_time: Instant::now(),
			peer_capability_version,
			protocol_version: 0,
			network_id: 0,
			genesis: H256::zero(),
			latest_hash: H256::zero(),
			latest_number: 0,
			difficulty: U256::zero(),
			sync_hash: H256::zero(),
			sync_hash_number: io.chain().chain_info().best_block_number + 1,
			require_transactions: false,
			sub: Subscription::new(download.clone()),
			config,
		}
	}

	/// Reply class currently outstanding.
	pub fn asking(&self) -> PeerAsking {
		self.asking.clone()
	}

	/// Effective negotiated protocol version.
	pub fn protocol_version(&self) -> u8 {
		self.protocol_version
	}

	/// Peer network id as reported in the handshake.
	pub fn network_id(&self) -> u64 {
		self.network_id
	}

	/// Peer chain genesis hash.
	pub fn genesis_hash(&self) -> H256 {
		self.genesis
	}

	/// Peer best block hash.
	pub fn latest_hash(&self) -> H256 {
		self.latest_hash
	}

	/// Peer best block number. Zero until a current-version handshake completes.
	pub fn latest_number(&self) -> BlockNumber {
		self.latest_number
	}

	/// Peer total difficulty.
	pub fn difficulty(&self) -> U256 {
		self.difficulty
	}

	/// Anchor hash of the outstanding hash request.
	pub fn sync_hash(&self) -> H256 {
		self.sync_hash
	}

	/// Anchor number of the outstanding hash request.
	pub fn sync_hash_number(&self) -> BlockNumber {
		self.sync_hash_number
	}

	/// Whether the peer expects transaction gossip from us.
	pub fn require_transactions(&self) -> bool {
		self.require_transactions
	}

	/// The download coordinator handle held by this peer.
	pub fn download_sub(&self) -> &Subscription {
		&self.sub
	}

	/// True while a request is outstanding.
	pub fn is_conversing(&self) -> bool {
		self.asking != PeerAsking::Nothing
	}

	/// True when dropping this peer would stall the sync: it is mid-handshake,
	/// answering a hash request, or a legacy peer answering a block request.
	/// The host uses this to protect the peer from eviction.
	pub fn is_critical_syncing(&self) -> bool {
		match self.asking {
			PeerAsking::Hashes | PeerAsking::State => true,
			PeerAsking::Blocks => self.protocol_version == ETH_PROTOCOL_VERSION_60.0,
			PeerAsking::Nothing => false,
		}
	}

	/// Transition back to idle.
	pub fn set_idle(&mut self, io: &mut dyn SyncIo) {
		self.set_asking(io, PeerAsking::Nothing);
	}

	/// Record a new asking state, stamp the request time and refresh the
	/// session status notes.
	pub(crate) fn set_asking(&mut self, io: &mut dyn SyncIo, asking: PeerAsking) {
		self.asking = asking;
		self.last_ask_time = Instant::now();

		io.add_note("ask", &self.asking.to_string());
		let mut sync = String::from(if self.is_critical_syncing() { "ONGOING" } else { "holding" });
		if self.needs_syncing() {
			sync.push_str(" & needed");
		}
		io.add_note("sync", &sync);
	}

	/// Whether the download coordinator still wants data from this peer.
	fn needs_syncing(&self) -> bool {
		!self.sub.man().is_empty()
	}

	/// Periodic timer. A request unanswered for `ASK_TIMEOUT` terminates the
	/// session; the timeout is the only hard failure path for a stuck peer.
	pub fn tick(&self, io: &mut dyn SyncIo) {
		if self.asking != PeerAsking::Nothing && self.last_ask_time.elapsed() > ASK_TIMEOUT {
			debug!(target: "sync", "{}: Timeout while asking {}", io.peer_id(), self.asking);
			io.disconnect(DisconnectReason::PingTimeout);
		}
	}

	/// Maximum number of blocks to request from this peer, read fresh from
	/// the reputation store on every call so a reset is observed immediately.
	pub fn ask_override(&self, io: &dyn SyncIo) -> usize {
		let data = io.reputation().data(io.peer_id(), ETH_PROTOCOL);
		if data.is_empty() {
			self.config.max_blocks_ask
		} else {
			Rlp::new(&data).as_val::<u64>().map(|v| v as usize).unwrap_or(self.config.max_blocks_ask)
		}
	}

	/// Flag the peer as badly behaved and shrink its ask override. The `+ 1`
	/// keeps the override from collapsing to zero.
	pub(crate) fn set_rude(&self, io: &mut dyn SyncIo) {
		let peer_id = io.peer_id();
		let old = self.ask_override(io);
		let new = old / 2 + 1;
		io.reputation().set_data(peer_id, ETH_PROTOCOL, ::rlp::encode(&(new as u64)));
		debug!(target: "sync", "{}: Rude behaviour; ask override now {}, was {}", peer_id, new, old);
		io.reputation().note_rude(peer_id, ETH_PROTOCOL);
		io.add_note("manners", "RUDE");
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::time::{Duration, Instant};

	use api::{SyncConfig, ETH_PROTOCOL};
	use download::DownloadMan;
	use ethereum_types::H256;
	use network::DisconnectReason;
	use reputation::{MemoryReputation, ReputationManager};
	use rlp::Rlp;
	use tests::helpers::{TestChain, TestIo};

	use super::*;

	fn dummy_peer() -> (SyncPeer, TestIo, Arc<DownloadMan>) {
		let chain = Arc::new(TestChain::new());
		let reputation = Arc::new(MemoryReputation::default());
		let download = Arc::new(DownloadMan::new());
		let io = TestIo::new(chain, reputation, 0);
		let peer = SyncPeer::new(SyncConfig::default(), &download, &io, 61);
		(peer, io, download)
	}

	#[test]
	fn set_asking_publishes_session_notes() {
		let (mut peer, mut io, download) = dummy_peer();
		peer.set_asking(&mut io, PeerAsking::Hashes);
		assert_eq!(io.notes.get("ask").unwrap(), "hashes");
		assert_eq!(io.notes.get("sync").unwrap(), "ONGOING");

		download.append_hashes(vec![H256::from_low_u64_be(1)]);
		peer.set_idle(&mut io);
		assert_eq!(io.notes.get("ask").unwrap(), "nothing");
		assert_eq!(io.notes.get("sync").unwrap(), "holding & needed");
	}

	#[test]
	fn critical_syncing_depends_on_state_and_version() {
		let (mut peer, mut io, _download) = dummy_peer();
		assert!(!peer.is_critical_syncing());
		peer.set_asking(&mut io, PeerAsking::State);
		assert!(peer.is_critical_syncing());
		peer.set_asking(&mut io, PeerAsking::Hashes);
		assert!(peer.is_critical_syncing());

		peer.protocol_version = 61;
		peer.set_asking(&mut io, PeerAsking::Blocks);
		assert!(!peer.is_critical_syncing());
		peer.protocol_version = 60;
		assert!(peer.is_critical_syncing());
	}

	#[test]
	fn tick_disconnects_a_stalled_conversation() {
		let (mut peer, mut io, _download) = dummy_peer();
		peer.set_asking(&mut io, PeerAsking::Blocks);
		peer.tick(&mut io);
		assert_eq!(io.disconnected, None);

		peer.last_ask_time = Instant::now() - (ASK_TIMEOUT + Duration::from_millis(1));
		peer.tick(&mut io);
		assert_eq!(io.disconnected, Some(DisconnectReason::PingTimeout));
	}

	#[test]
	fn tick_ignores_ask_time_when_idle() {
		let (mut peer, mut io, _download) = dummy_peer();
		peer.last_ask_time = Instant::now() - Duration::from_secs(60);
		peer.tick(&mut io);
		assert_eq!(io.disconnected, None);
	}

	#[test]
	fn ask_override_defaults_and_reads_the_store() {
		let (peer, io, _download) = dummy_peer();
		assert_eq!(peer.ask_override(&io), 32);

		io.reputation.set_data(0, ETH_PROTOCOL, ::rlp::encode(&100u64));
		assert_eq!(peer.ask_override(&io), 100);

		// unreadable blob falls back to the configured default
		io.reputation.set_data(0, ETH_PROTOCOL, vec![0xc0]);
		assert_eq!(peer.ask_override(&io), 32);
	}

	#[test]
	fn rudeness_halves_the_override_but_never_to_zero() {
		let (peer, mut io, _download) = dummy_peer();
		let mut expected = vec![];
		let mut value = 32;
		for _ in 0..6 {
			value = value / 2 + 1;
			expected.push(value);
		}
		assert_eq!(expected, vec![17, 9, 5, 3, 2, 2]);

		for want in expected {
			peer.set_rude(&mut io);
			let data = io.reputation.data(0, ETH_PROTOCOL);
			assert_eq!(Rlp::new(&data).as_val::<u64>().unwrap(), want as u64);
			assert!(want > 0);
		}
		assert!(io.reputation.is_rude(0, ETH_PROTOCOL));
		assert_eq!(io.notes.get("manners").unwrap(), "RUDE");
	}
}

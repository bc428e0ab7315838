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

//! Per-peer reputation storage. Each capability keeps an opaque blob per
//! session plus a sticky "rude" flag; the sync handler uses its blob to
//! persist the adaptive block-fetch batch size.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;

use network::{PeerId, ProtocolId};

/// Reputation store keyed by session and capability name. Implementations
/// must tolerate concurrent access from many peer handlers.
pub trait ReputationManager: Send + Sync {
	/// Whether the peer has been flagged as badly behaved.
	fn is_rude(&self, peer: PeerId, name: ProtocolId) -> bool;

	/// Read the capability blob. Empty if never written.
	fn data(&self, peer: PeerId, name: ProtocolId) -> Bytes;

	/// Replace the capability blob.
	fn set_data(&self, peer: PeerId, name: ProtocolId, data: Bytes);

	/// Flag the peer as badly behaved. Irrevocable within the session.
	fn note_rude(&self, peer: PeerId, name: ProtocolId);
}

#[derive(Default)]
struct Entry {
	data: Bytes,
	rude: bool,
}

/// In-memory reputation store.
#[derive(Default)]
pub struct MemoryReputation {
	entries: RwLock<HashMap<(PeerId, ProtocolId), Entry>>,
}

impl ReputationManager for MemoryReputation {
	fn is_rude(&self, peer: PeerId, name: ProtocolId) -> bool {
		self.entries.read().get(&(peer, name)).map_or(false, |e| e.rude)
	}

	fn data(&self, peer: PeerId, name: ProtocolId) -> Bytes {
		self.entries.read().get(&(peer, name)).map_or_else(Bytes::new, |e| e.data.clone())
	}

	fn set_data(&self, peer: PeerId, name: ProtocolId, data: Bytes) {
		self.entries.write().entry((peer, name)).or_insert_with(Entry::default).data = data;
	}

	fn note_rude(&self, peer: PeerId, name: ProtocolId) {
		self.entries.write().entry((peer, name)).or_insert_with(Entry::default).rude = true;
	}
}

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

use client::BlockChainClient;
use network::{DisconnectReason, Error, PacketId, PeerId};
use reputation::ReputationManager;

/// IO interface for the syncing handler, scoped to a single peer session.
/// Provides the session downcalls and access to the shared collaborators.
pub trait SyncIo {
	/// Disconnect the session with the given reason.
	fn disconnect(&mut self, reason: DisconnectReason);
	/// Respond to the request currently being dispatched.
	fn respond(&mut self, packet_id: PacketId, data: Vec<u8>) -> Result<(), Error>;
	/// Send a packet over the session.
	fn send(&mut self, packet_id: PacketId, data: Vec<u8>) -> Result<(), Error>;
	/// Attach a human-readable status note to the session.
	fn add_note(&mut self, key: &str, value: &str);
	/// Adjust the session rating.
	fn add_rating(&mut self, delta: i32);
	/// Get the blockchain.
	fn chain(&self) -> &dyn BlockChainClient;
	/// Get the reputation store.
	fn reputation(&self) -> &dyn ReputationManager;
	/// Id of the remote peer this session is connected to.
	fn peer_id(&self) -> PeerId;
}

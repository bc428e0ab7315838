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

//! Packet ids used by the sync subprotocol. Converting the raw wire id
//! through `from_u8` doubles as the "is this packet ours" check, so new ids
//! cannot clash silently.

use network::PacketId;

enum_from_primitive! {
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPacket {
	StatusPacket = 0x00,
	TransactionsPacket = 0x02,
	GetBlockHashesPacket = 0x03,
	GetBlockHashesByNumberPacket = 0x04,
	BlockHashesPacket = 0x05,
	GetBlocksPacket = 0x06,
	BlocksPacket = 0x07,
	NewBlockPacket = 0x08,
	NewBlockHashesPacket = 0x09,
}
}

impl SyncPacket {
	/// The id sent over the wire.
	pub fn id(self) -> PacketId {
		self as PacketId
	}
}

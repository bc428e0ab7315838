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

//! Session-level primitives shared with the network stack.

use std::fmt;

/// Node id within the connected peer set.
pub type PeerId = usize;
/// Packet id within a subprotocol.
pub type PacketId = u8;
/// Subprotocol name, three ASCII bytes on the wire.
pub type ProtocolId = [u8; 3];

/// Reason for disconnecting a session, as carried by the devp2p Disconnect packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
	DisconnectRequested,
	TCPError,
	BadProtocol,
	UselessPeer,
	TooManyPeers,
	DuplicatePeer,
	IncompatibleProtocol,
	NullIdentity,
	ClientQuit,
	UnexpectedIdentity,
	LocalIdentity,
	PingTimeout,
	Unknown,
}

impl DisconnectReason {
	pub fn from_u8(n: u8) -> DisconnectReason {
		match n {
			0 => DisconnectReason::DisconnectRequested,
			1 => DisconnectReason::TCPError,
			2 => DisconnectReason::BadProtocol,
			3 => DisconnectReason::UselessPeer,
			4 => DisconnectReason::TooManyPeers,
			5 => DisconnectReason::DuplicatePeer,
			6 => DisconnectReason::IncompatibleProtocol,
			7 => DisconnectReason::NullIdentity,
			8 => DisconnectReason::ClientQuit,
			9 => DisconnectReason::UnexpectedIdentity,
			10 => DisconnectReason::LocalIdentity,
			11 => DisconnectReason::PingTimeout,
			_ => DisconnectReason::Unknown,
		}
	}
}

impl fmt::Display for DisconnectReason {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::DisconnectReason::*;

		let msg = match *self {
			DisconnectRequested => "disconnect requested",
			TCPError => "TCP error",
			BadProtocol => "bad protocol",
			UselessPeer => "useless peer",
			TooManyPeers => "too many peers",
			DuplicatePeer => "duplicate peer",
			IncompatibleProtocol => "incompatible protocol",
			NullIdentity => "null identity",
			ClientQuit => "client quit",
			UnexpectedIdentity => "unexpected identity",
			LocalIdentity => "local identity",
			PingTimeout => "ping timeout",
			Unknown => "unknown",
		};

		f.write_str(msg)
	}
}

#[derive(Debug)]
/// Session transport error.
pub enum Error {
	/// Message expired before it could be sent.
	Expired,
	/// Peer not found in the connected set.
	PeerNotFound,
	/// Peer is disconnected.
	Disconnect(DisconnectReason),
	/// Packet size is over the protocol limit.
	OversizedPacket,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Error::*;

		let msg = match *self {
			Expired => "Expired message".into(),
			PeerNotFound => "Peer not found".into(),
			Disconnect(ref reason) => format!("Peer disconnected: {}", reason),
			OversizedPacket => "Packet is too large".into(),
		};

		f.write_fmt(format_args!("Network error ({})", msg))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn disconnect_reason_codes() {
		assert_eq!(DisconnectReason::ClientQuit, DisconnectReason::from_u8(8));
		assert_eq!(DisconnectReason::PingTimeout, DisconnectReason::from_u8(11));
		assert_eq!(DisconnectReason::Unknown, DisconnectReason::from_u8(19));
	}
}

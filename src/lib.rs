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

#![warn(missing_docs)]

//! Blockchain sync module.
//!
//! Implements the per-peer half of the chain synchronization protocol:
//! one handler per connected remote, each running a small asking state
//! machine over a shared session transport. The handler downloads the
//! remote's chain via hash and block requests, serves the inverse queries
//! from the local chain, and forwards gossip to the host. Peers that stall
//! are disconnected after a fixed timeout; peers that abort mid-request are
//! remembered as rude and asked for smaller batches from then on.

extern crate bytes;
extern crate ethereum_types;
extern crate parking_lot;
extern crate rlp;

#[macro_use]
extern crate enum_primitive;
#[macro_use]
extern crate log;

#[cfg(test)]
extern crate env_logger;
#[cfg(test)]
extern crate hash;

mod api;
mod chain;
mod client;
mod download;
mod network;
mod reputation;
mod sync_io;

#[cfg(test)]
mod tests;

pub use api::{SyncConfig, SyncHost, ETH_PROTOCOL, ETH_PROTOCOL_VERSION_60, ETH_PROTOCOL_VERSION_61};
pub use chain::sync_packet::SyncPacket;
pub use chain::{PeerAsking, SyncHandler, SyncPeer, SyncPropagator, SyncRequester, SyncSupplier};
pub use client::{BlockChainClient, BlockChainInfo, BlockDetails, BlockNumber};
pub use download::{DownloadMan, Subscription};
pub use network::{DisconnectReason, Error, PacketId, PeerId, ProtocolId};
pub use reputation::{MemoryReputation, ReputationManager};
pub use sync_io::SyncIo;

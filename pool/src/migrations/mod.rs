// Copyright (C) 2020-2022  Intergalactic, Limited (GIB).
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Persisted pool state.
//!
//! State is stored as a SCALE encoded `StorageVersion` followed by the `PoolState` of that version.
//! Older versions are migrated on load.

pub mod v1;

use crate::types::{StorageVersion, STORAGE_VERSION};
use crate::{Config, Error, Pool, PoolStateOf, LOG_TARGET};
use codec::{Decode, Encode};
use sp_std::prelude::*;

impl<T: Config> Pool<T> {
	/// Encode the pool state together with its storage version.
	pub fn encode_state(&self) -> Vec<u8> {
		(STORAGE_VERSION, &self.state).encode()
	}

	/// Load a pool from encoded state, migrating older layouts.
	pub fn decode_state(mut bytes: &[u8]) -> Result<Self, Error> {
		let version = StorageVersion::decode(&mut bytes).map_err(|_| Error::CorruptedState)?;
		let state = match version {
			StorageVersion(0) => v1::migrate::<T>(bytes)?,
			v if v == STORAGE_VERSION => decode_exact::<PoolStateOf<T>>(bytes)?,
			v => {
				log::error!(target: LOG_TARGET, "unsupported storage version {:?}", v);
				return Err(Error::UnsupportedVersion);
			}
		};
		Ok(Self::from_state(state))
	}
}

/// Decode `bytes` as `D`, failing when anything is left over.
pub(crate) fn decode_exact<D: Decode>(mut bytes: &[u8]) -> Result<D, Error> {
	let value = D::decode(&mut bytes).map_err(|e| {
		log::error!(target: LOG_TARGET, "failed to decode pool state: {:?}", e);
		Error::CorruptedState
	})?;
	if !bytes.is_empty() {
		log::error!(target: LOG_TARGET, "{} trailing bytes after pool state", bytes.len());
		return Err(Error::CorruptedState);
	}
	Ok(value)
}

//! Typed wrappers around the `actions` contract.
use client_blockchain_core::{Felt, InvokeReceipt, ProviderError, SessionAccount};

use crate::session::NetworkSession;

/// Manifest name of the contract exposing the game systems.
pub const ACTIONS_CONTRACT: &str = "actions";

/// Terrain placed on a tile. Discriminants match the on-chain enum.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileType {
    Empty = 0,
    Grass = 1,
    Road = 2,
    Water = 3,
    Building = 4,
}

impl TileType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TileType::Empty),
            1 => Some(TileType::Grass),
            2 => Some(TileType::Road),
            3 => Some(TileType::Water),
            4 => Some(TileType::Building),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub tile_type: TileType,
}

impl Tile {
    pub fn new(row: u32, col: u32, tile_type: TileType) -> Self {
        Self { row, col, tile_type }
    }
}

/// Serialize `tiles` as a Cairo `Array<Tile>`: length, then each struct's members.
pub fn place_tile_calldata(tiles: &[Tile]) -> Vec<Felt> {
    let mut calldata = Vec::with_capacity(1 + tiles.len() * 3);
    calldata.push(Felt::from(tiles.len() as u64));
    for tile in tiles {
        calldata.push(Felt::from(tile.row));
        calldata.push(Felt::from(tile.col));
        calldata.push(Felt::from(tile.tile_type as u8));
    }
    calldata
}

/// System calls bound to a network session.
pub struct SystemCalls<'a> {
    session: &'a NetworkSession,
}

impl<'a> SystemCalls<'a> {
    pub fn new(session: &'a NetworkSession) -> Self {
        Self { session }
    }

    /// Register the signer as a player.
    pub async fn spawn(&self, signer: &dyn SessionAccount) -> Result<InvokeReceipt, ProviderError> {
        tracing::info!("spawn: player {:#x}", signer.address());
        self.session
            .execute(signer, ACTIONS_CONTRACT, "spawn", Vec::new())
            .await
    }

    /// Place `tiles` on the board in a single transaction.
    pub async fn place_tile(
        &self,
        signer: &dyn SessionAccount,
        tiles: &[Tile],
    ) -> Result<InvokeReceipt, ProviderError> {
        tracing::info!("place_tile: {} tiles from {:#x}", tiles.len(), signer.address());
        self.session
            .execute(signer, ACTIONS_CONTRACT, "place_tile", place_tile_calldata(tiles))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_tile_calldata_layout() {
        let tiles = [
            Tile::new(1, 2, TileType::Road),
            Tile::new(3, 4, TileType::Water),
        ];

        let expected: Vec<Felt> = [2u32, 1, 2, 2, 3, 4, 3].into_iter().map(Felt::from).collect();
        assert_eq!(place_tile_calldata(&tiles), expected);
        assert_eq!(place_tile_calldata(&[]), vec![Felt::ZERO]);
    }

    #[test]
    fn test_tile_type_discriminants() {
        for value in 0..=4u8 {
            assert_eq!(TileType::from_u8(value).map(|t| t as u8), Some(value));
        }
        assert_eq!(TileType::from_u8(5), None);
    }
}

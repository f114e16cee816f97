// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Hash addresses.
//!
//! Every tweakable hash call is domain-separated by a 32-byte address naming
//! the layer, tree, key pair, chain and position it belongs to.

/// What an address is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub(crate) enum AddressType {
    WotsHash = 0,
    WotsPk = 1,
    Tree = 2,
    ForsTree = 3,
    ForsRoots = 4,
    WotsPrf = 5,
    ForsPrf = 6,
}

const LAYER: usize = 0;
const TREE: usize = 4;
const TYPE: usize = 16;
const KEYPAIR: usize = 20;
const CHAIN: usize = 24;
const HASH: usize = 28;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Address([u8; 32]);

impl Address {
    fn set_word(&mut self, offset: usize, value: u32) {
        self.0[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    fn word(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.0[offset..offset + 4]);
        u32::from_be_bytes(word)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn set_layer(&mut self, layer: u32) {
        self.set_word(LAYER, layer);
    }

    /// The tree address is 12 bytes wide; indices fit in the low 8.
    pub(crate) fn set_tree(&mut self, tree: u64) {
        self.0[TREE..TREE + 4].fill(0);
        self.0[TREE + 4..TYPE].copy_from_slice(&tree.to_be_bytes());
    }

    /// Set the type and clear the type-specific words.
    pub(crate) fn set_type_and_clear(&mut self, kind: AddressType) {
        self.set_word(TYPE, kind as u32);
        self.0[KEYPAIR..].fill(0);
    }

    pub(crate) fn set_keypair(&mut self, keypair: u32) {
        self.set_word(KEYPAIR, keypair);
    }

    pub(crate) fn keypair(&self) -> u32 {
        self.word(KEYPAIR)
    }

    pub(crate) fn set_chain(&mut self, chain: u32) {
        self.set_word(CHAIN, chain);
    }

    pub(crate) fn set_hash(&mut self, hash: u32) {
        self.set_word(HASH, hash);
    }

    pub(crate) fn set_tree_height(&mut self, height: u32) {
        self.set_word(CHAIN, height);
    }

    pub(crate) fn set_tree_index(&mut self, index: u32) {
        self.set_word(HASH, index);
    }

    pub(crate) fn tree_index(&self) -> u32 {
        self.word(HASH)
    }
}

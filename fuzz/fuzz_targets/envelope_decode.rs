//! Fuzz target for the reply envelope decoders
//!
//! Feeds arbitrary bytes to every decoder to find:
//! - Parser panics on malformed JSON
//! - Envelope shapes accepted as one form but misread as another
//! - Page ranges that overflow on hostile page numbers
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wallfeed_proto::{CommentReply, MessagesPage, PageRange, PageSizeReply};

fuzz_target!(|data: &[u8]| {
    let _ = PageSizeReply::decode(data).map(|reply| reply.usable());
    let _ = CommentReply::decode(data);

    if let Ok(page) = MessagesPage::decode(data) {
        assert_eq!(page.len(), page.records.len());
    }

    if data.len() >= 16 {
        let mut page = [0u8; 8];
        let mut size = [0u8; 8];
        page.copy_from_slice(&data[..8]);
        size.copy_from_slice(&data[8..16]);

        let page = u64::from_le_bytes(page) as usize;
        let size = u64::from_le_bytes(size) as usize;
        if let Ok(range) = PageRange::for_page(page, size) {
            assert_eq!(range.len(), size);
        }
    }
});

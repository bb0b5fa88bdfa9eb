//! Message file assembly.
//!
//! The file is a count word, a directory of (offset, length) pairs, then
//! the enciphered message bodies back to back. Offsets are 1-based file
//! positions, the convention every native reader expects.

use nubridge_codec::RecordWriter;

/// Assemble a message file from already-enciphered records.
pub fn encode_message_file(records: &[Vec<u8>]) -> Vec<u8> {
    let directory_len = 2 + 6 * records.len();
    let mut w = RecordWriter::with_capacity(
        directory_len + records.iter().map(Vec::len).sum::<usize>(),
    );

    w.put_u16(records.len() as u16);
    let mut offset = directory_len;
    for record in records {
        w.put_u32(offset as u32 + 1);
        w.put_u16(record.len() as u16);
        offset += record.len();
    }
    for record in records {
        w.put_bytes(record);
    }
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubridge_codec::encipher_message;

    #[test]
    fn empty_file_is_just_the_count() {
        assert_eq!(encode_message_file(&[]), vec![0, 0]);
    }

    #[test]
    fn directory_points_at_each_body() {
        let records = vec![encipher_message("first"), encipher_message("second!")];
        let bytes = encode_message_file(&records);

        assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), 2);
        let offset0 = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]) as usize;
        let len0 = u16::from_le_bytes([bytes[6], bytes[7]]) as usize;
        let offset1 = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let len1 = u16::from_le_bytes([bytes[12], bytes[13]]) as usize;

        assert_eq!(&bytes[offset0 - 1..offset0 - 1 + len0], &records[0][..]);
        assert_eq!(&bytes[offset1 - 1..offset1 - 1 + len1], &records[1][..]);
        assert_eq!(offset1 - 1 + len1, bytes.len());
    }
}

//! The static shard list of spec.md §4.8: hex-prefix keys of a fixed length,
//! e.g. length 1 gives the 16 shards `"0".."f"`.

/// Generates every hex prefix of `length` digits, in ascending numeric order.
pub fn generate_shards(length: usize) -> Vec<String> {
    let count = 16usize.pow(length as u32);
    (0..count).map(|i| format!("{i:0length$x}", length = length)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_one_gives_sixteen_hex_digits() {
        let shards = generate_shards(1);
        assert_eq!(shards.len(), 16);
        assert_eq!(shards.first(), Some(&"0".to_string()));
        assert_eq!(shards.last(), Some(&"f".to_string()));
    }

    #[test]
    fn length_two_zero_pads_and_covers_256_shards() {
        let shards = generate_shards(2);
        assert_eq!(shards.len(), 256);
        assert_eq!(shards[0], "00");
        assert_eq!(shards[1], "01");
        assert_eq!(shards[255], "ff");
    }
}

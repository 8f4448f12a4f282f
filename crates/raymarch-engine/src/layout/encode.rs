use super::records::GpuRecord;
use super::schema::SchemaVersion;

/// Encodes `records` into the byte layout of `version`.
///
/// The output is exactly `records.len() * R::stride(version)` bytes.
pub fn encode<R: GpuRecord>(records: &[R], version: SchemaVersion) -> Vec<u8> {
    if version == SchemaVersion::LATEST {
        // The struct is the latest layout (asserted at compile time).
        return bytemuck::cast_slice(records).to_vec();
    }
    encode_fields(records, version)
}

fn encode_fields<R: GpuRecord>(records: &[R], version: SchemaVersion) -> Vec<u8> {
    let stride = R::stride(version) as usize;
    let mut out = Vec::with_capacity(records.len() * stride);

    for record in records {
        let bytes = bytemuck::bytes_of(record);
        for field in R::FIELDS.iter().filter(|f| f.present_in(version)) {
            out.extend_from_slice(&bytes[field.offset..field.offset + field.ty.size()]);
        }
    }

    debug_assert_eq!(out.len(), records.len() * stride);
    out
}

/// Decodes a buffer written by [`encode`].
///
/// Fields absent at `version` come back as their `Default` value. Returns
/// `None` when `bytes` is not a whole number of records.
pub fn decode<R: GpuRecord>(bytes: &[u8], version: SchemaVersion) -> Option<Vec<R>> {
    let stride = R::stride(version) as usize;
    if stride == 0 || bytes.len() % stride != 0 {
        return None;
    }

    let records = bytes
        .chunks_exact(stride)
        .map(|chunk| {
            let mut record = R::default();
            let dst = bytemuck::bytes_of_mut(&mut record);
            let mut cursor = 0;
            for field in R::FIELDS.iter().filter(|f| f.present_in(version)) {
                let size = field.ty.size();
                dst[field.offset..field.offset + size]
                    .copy_from_slice(&chunk[cursor..cursor + size]);
                cursor += size;
            }
            record
        })
        .collect();

    Some(records)
}

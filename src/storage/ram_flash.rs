use embedded_storage::{ReadStorage, Storage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RamFlashError {
    OutOfBounds,
    Injected,
}

/// Byte-addressable storage held in memory, erased to 0xFF. Host builds and
/// tests use it in place of the device flash; faults can be injected.
#[derive(Clone, Debug)]
pub struct RamFlash {
    bytes: Vec<u8>,
    fail_reads: bool,
    fail_writes: bool,
    write_count: u32,
}

impl RamFlash {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0xFF; capacity],
            fail_reads: false,
            fail_writes: false,
            write_count: 0,
        }
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Overwrites raw bytes without bookkeeping, e.g. to model a torn write.
    pub fn poke(&mut self, offset: usize, bytes: &[u8]) {
        let end = (offset + bytes.len()).min(self.bytes.len());
        if offset < end {
            self.bytes[offset..end].copy_from_slice(&bytes[..end - offset]);
        }
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, RamFlashError> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(RamFlashError::OutOfBounds)?;
        if end > self.bytes.len() {
            return Err(RamFlashError::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl ReadStorage for RamFlash {
    type Error = RamFlashError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(RamFlashError::Injected);
        }
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for RamFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(RamFlashError::Injected);
        }
        let range = self.range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        self.write_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_erased() {
        let mut flash = RamFlash::new(64);
        let mut buf = [0u8; 8];
        flash.read(56, &mut buf).unwrap();
        assert_eq!(buf, [0xFF; 8]);
        assert_eq!(flash.capacity(), 64);
    }

    #[test]
    fn rejects_out_of_bounds_access() {
        let mut flash = RamFlash::new(16);
        assert_eq!(flash.write(12, &[0; 8]), Err(RamFlashError::OutOfBounds));
        let mut buf = [0u8; 4];
        assert_eq!(flash.read(u32::MAX, &mut buf), Err(RamFlashError::OutOfBounds));
    }

    #[test]
    fn injected_write_fault_leaves_bytes_untouched() {
        let mut flash = RamFlash::new(16);
        flash.set_fail_writes(true);
        assert_eq!(flash.write(0, &[1, 2, 3]), Err(RamFlashError::Injected));
        assert!(flash.as_bytes().iter().all(|&byte| byte == 0xFF));
        assert_eq!(flash.write_count(), 0);
    }
}

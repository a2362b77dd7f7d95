mod common;

mod tests {
    use crate::common::{MemoryStream, StreamError};
    use embedded_io::ErrorKind;
    use myrtio_light_player::error::{AllocError, ReadError};
    use myrtio_light_player::record::{DELIMITER, RecordBuffer, RecordReader};
    use proptest::prelude::*;

    fn collect<const CHUNK: usize>(stream: &mut MemoryStream) -> Vec<Vec<u8>> {
        let mut reader = RecordReader::<CHUNK>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(4096);
        let mut records = Vec::new();
        while let Some(record) = reader.next_record(stream, &mut buffer).unwrap() {
            records.push(record.to_vec());
        }
        records
    }

    #[test]
    fn test_buffer_growth_preserves_contents() {
        let mut buffer = RecordBuffer::new(1024);
        assert_eq!(buffer.capacity(), 0);

        buffer.append(b"abc").unwrap();
        let first = buffer.capacity();
        assert!(first >= 3);

        let tail = [7u8; 100];
        buffer.append(&tail).unwrap();
        assert!(buffer.capacity() >= 103);

        let record = buffer.take();
        assert_eq!(&record[..3], b"abc");
        assert_eq!(&record[3..], &tail[..]);
    }

    #[test]
    fn test_buffer_take_clears_and_keeps_capacity() {
        let mut buffer = RecordBuffer::new(64);
        buffer.append(b"hello").unwrap();
        let capacity = buffer.capacity();
        {
            let record = buffer.take();
            assert_eq!(&*record, b"hello");
        }
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn test_buffer_limit_is_all_or_nothing() {
        let mut buffer = RecordBuffer::new(8);
        buffer.append(b"123456").unwrap();
        assert_eq!(buffer.append(b"789"), Err(AllocError));
        assert_eq!(buffer.len(), 6);

        buffer.append(b"78").unwrap();
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_ensure_capacity_overflow() {
        let mut buffer = RecordBuffer::new(usize::MAX);
        buffer.append(b"x").unwrap();
        assert_eq!(buffer.ensure_capacity(usize::MAX), Err(AllocError));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_reads_records() {
        let mut stream = MemoryStream::new(b"30;abc;def;");
        let records = collect::<4>(&mut stream);
        assert_eq!(records, vec![b"30".to_vec(), b"abc".to_vec(), b"def".to_vec()]);
    }

    #[test]
    fn test_empty_records() {
        let mut stream = MemoryStream::new(b";;x;");
        let records = collect::<64>(&mut stream);
        assert_eq!(records, vec![vec![], vec![], b"x".to_vec()]);
    }

    #[test]
    fn test_record_longer_than_chunk() {
        let long: Vec<u8> = (0..200u8).map(|i| i % 50).collect();
        let mut data = long.clone();
        data.push(DELIMITER);
        let mut stream = MemoryStream::new(&data);
        assert_eq!(collect::<8>(&mut stream), vec![long]);
    }

    #[test]
    fn test_trailing_bytes_are_truncated() {
        let mut stream = MemoryStream::new(b"30;ab");
        let mut reader = RecordReader::<4>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(64);

        let record = reader.next_record(&mut stream, &mut buffer).unwrap();
        assert_eq!(record.as_deref(), Some(&b"30"[..]));
        drop(record);

        let err = reader.next_record(&mut stream, &mut buffer).unwrap_err();
        assert_eq!(err, ReadError::Truncated { len: 2 });
        assert!(buffer.is_empty());

        assert!(reader.next_record(&mut stream, &mut buffer).unwrap().is_none());
    }

    #[test]
    fn test_io_error_is_reported() {
        let mut stream = MemoryStream::new(b"30;abcdef;").failing_at(5);
        let mut reader = RecordReader::<4>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(64);

        assert!(reader.next_record(&mut stream, &mut buffer).unwrap().is_some());
        let err = reader.next_record(&mut stream, &mut buffer).unwrap_err();
        assert_eq!(err, ReadError::Io(StreamError(ErrorKind::Other)));
    }

    #[test]
    fn test_record_over_limit_is_alloc_error() {
        let mut stream = MemoryStream::new(b"0123456789;");
        let mut reader = RecordReader::<4>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(6);

        let err = reader.next_record(&mut stream, &mut buffer).unwrap_err();
        assert_eq!(err, ReadError::Alloc);
    }

    #[test]
    fn test_reset_after_rewind() {
        use embedded_io::Seek;

        let mut stream = MemoryStream::new(b"ab;cd;");
        let mut reader = RecordReader::<64>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(64);

        let first = reader.next_record(&mut stream, &mut buffer).unwrap().map(|r| r.to_vec());
        assert_eq!(first, Some(b"ab".to_vec()));

        stream.rewind().unwrap();
        reader.reset();
        let again = reader.next_record(&mut stream, &mut buffer).unwrap().map(|r| r.to_vec());
        assert_eq!(again, Some(b"ab".to_vec()));
    }

    #[test]
    fn test_cancel_between_chunks_resumes() {
        use std::cell::Cell;

        let mut stream = MemoryStream::new(b"abcdefghij;k;");
        let mut reader = RecordReader::<4>::new(DELIMITER);
        let mut buffer = RecordBuffer::new(64);
        let reads = stream.read_counter();
        let cancel = Cell::new(true);

        // First chunk is read, the second is not
        let gate = || reads.get() >= 1 && cancel.get();
        let err = reader
            .next_record_or_cancel(&mut stream, &mut buffer, gate)
            .unwrap_err();
        assert_eq!(err, ReadError::Cancelled);
        assert_eq!(reads.get(), 1);
        assert_eq!(buffer.len(), 4);

        cancel.set(false);
        let record = reader
            .next_record_or_cancel(&mut stream, &mut buffer, || cancel.get())
            .unwrap()
            .map(|record| record.to_vec());
        assert_eq!(record, Some(b"abcdefghij".to_vec()));
    }

    fn record_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
        let byte = any::<u8>().prop_filter("delimiter", |b| *b != DELIMITER);
        prop::collection::vec(prop::collection::vec(byte, 0..40), 0..10)
    }

    proptest! {
        #[test]
        fn test_chunking_does_not_change_records(
            records in record_strategy(),
            sizes in prop::collection::vec(1usize..20, 1..8),
        ) {
            let mut data = Vec::new();
            for record in &records {
                data.extend_from_slice(record);
                data.push(DELIMITER);
            }

            let mut split = MemoryStream::new(&data).with_read_sizes(&sizes);
            prop_assert_eq!(&collect::<64>(&mut split), &records);

            let mut tiny = MemoryStream::new(&data).with_read_sizes(&sizes);
            prop_assert_eq!(&collect::<1>(&mut tiny), &records);

            let mut whole = MemoryStream::new(&data);
            prop_assert_eq!(&collect::<7>(&mut whole), &records);
        }
    }
}

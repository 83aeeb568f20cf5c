//! The shared command catalogue (§4.2): one default-bodied async method per
//! operation, implemented once here and inherited by both client facades.
//! [`StandaloneClient`](super::StandaloneClient) and
//! [`ClusterClient`](super::ClusterClient) each implement only [`Dispatch`]
//! — how to actually hand a built [`Command`] or [`Batch`] to the
//! multiplexer — and get the rest for free, the way `redis-rs`'s
//! `ConnectionLike`/`Commands` split keeps one command surface off of two
//! connection kinds.
//!
//! Cluster-only explicit routing (§4.7) is not part of this trait: every
//! method here dispatches with whatever a [`Dispatch`] implementor's `send`
//! does by default (unrouted for standalone, "let the transport choose" for
//! cluster). [`ClusterClient`](super::ClusterClient) additionally exposes a
//! small set of `_routed` methods for the cases (`FLUSHALL`-style fan-out,
//! an explicit slot key) where a caller must pick a [`RouteHint`] by hand.

use std::time::Duration;

use bytes::Bytes;

use crate::{
    batch::Batch,
    commands::{
        geo::{self, DistanceUnit, FromPosition, GeoAddOptions, GeoPoint, GeoSearchOptions, GeoShape},
        hashes::{self, HGetExOptions, HScanOptions, HSetExOptions},
        hyperloglog,
        keys::{self, CopyOptions, ScanOptions},
        lists::{self, InsertPosition, ListEnd},
        pubsub,
        scripting,
        server::{self, FlushMode},
        sets::{self, SScanOptions, SetOp},
        sorted_sets::{self, PopEnd, RangeBy, ZAddOptions, ZRangeOptions, ZScanOptions},
        streams::{self, StreamId, TrimOptions},
        strings::{self, GetExOptions},
        transactions,
    },
    decoder::{ExpectedShape, Value},
    error::Result,
    multiplexer::TimeoutOverride,
};

/// What a client facade needs to provide for [`Commands`]'s default method
/// bodies to work: a way to run one command, and a way to run one batch.
pub trait Dispatch {
    /// Runs a single command, decoding its response as `expected`. Most
    /// callers pass `None` for `timeout_override` and get the connection's
    /// `default_timeout`; the blocking list/sorted-set pops pass a computed
    /// override so a `timeout_secs` of `0` (§8's "block indefinitely") isn't
    /// cut short by it.
    fn send(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;

    /// Runs an atomic batch or pipeline, splitting its response positionally.
    fn send_batch(&self, batch: Batch) -> impl std::future::Future<Output = Result<Vec<Result<Value>>>> + Send;
}

use crate::protocol::Command;

/// Extra client-side wait time added past a blocking command's own
/// `timeout_secs` so a slow-but-legitimate server reply isn't cut off by
/// `default_timeout` before the server's own BLPOP/BZPOPMIN deadline fires.
const BLOCKING_TIMEOUT_MARGIN: Duration = Duration::from_millis(500);

/// Converts a blocking pop's server-side `timeout_secs` argument into the
/// matching client-side wait policy: `<= 0` means "block indefinitely" for
/// both the server and this call (§8's boundary behavior); otherwise the
/// client waits the requested duration plus a fixed margin.
fn blocking_timeout_override(timeout_secs: f64) -> TimeoutOverride {
    if timeout_secs <= 0.0 {
        TimeoutOverride::Unbounded
    } else {
        TimeoutOverride::After(Duration::from_secs_f64(timeout_secs) + BLOCKING_TIMEOUT_MARGIN)
    }
}

/// The full command catalogue (§4.2), implemented once against [`Dispatch`]
/// and inherited by every client facade. An empty `impl Commands for Foo {}`
/// is all a facade needs once it implements [`Dispatch`].
pub trait Commands: Dispatch {
    /// Runs a previously assembled [`Batch`] (§4.3) and returns one result
    /// per member command, in order.
    fn exec_batch(&self, batch: Batch) -> impl std::future::Future<Output = Result<Vec<Result<Value>>>> + Send
    where
        Self: Sized,
    {
        self.send_batch(batch)
    }

    // -- generic key space --

    fn del(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::del(keys), ExpectedShape::Raw, None)
    }

    fn unlink(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::unlink(keys), ExpectedShape::Raw, None)
    }

    fn exists(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::exists(keys), ExpectedShape::Raw, None)
    }

    fn expire(&self, key: Bytes, seconds: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::expire(key, seconds), ExpectedShape::Raw, None)
    }

    fn pexpire(&self, key: Bytes, millis: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::pexpire(key, millis), ExpectedShape::Raw, None)
    }

    fn expire_at(&self, key: Bytes, unix_seconds: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::expire_at(key, unix_seconds), ExpectedShape::Raw, None)
    }

    fn pexpire_at(&self, key: Bytes, unix_millis: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::pexpire_at(key, unix_millis), ExpectedShape::Raw, None)
    }

    fn ttl(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::ttl(key), ExpectedShape::Raw, None)
    }

    fn pttl(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::pttl(key), ExpectedShape::Raw, None)
    }

    fn persist(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::persist(key), ExpectedShape::Raw, None)
    }

    fn key_type(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::key_type(key), ExpectedShape::Raw, None)
    }

    fn rename(&self, key: Bytes, new_key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::rename(key, new_key), ExpectedShape::Raw, None)
    }

    fn rename_nx(&self, key: Bytes, new_key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::rename_nx(key, new_key), ExpectedShape::Raw, None)
    }

    fn copy(&self, source: Bytes, destination: Bytes, options: CopyOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::copy(source, destination, options), ExpectedShape::Raw, None)
    }

    fn scan(&self, cursor: u64, options: ScanOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(keys::scan(cursor, options), ExpectedShape::Raw, None)
    }

    // -- strings / numeric --

    fn get(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::get(key), ExpectedShape::Raw, None)
    }

    fn get_ex(&self, key: Bytes, options: GetExOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = strings::get_ex(key, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn get_del(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::get_del(key), ExpectedShape::Raw, None)
    }

    fn mget(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::mget(keys), ExpectedShape::Raw, None)
    }

    fn mset(&self, pairs: impl IntoIterator<Item = (Bytes, Bytes)> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::mset(pairs), ExpectedShape::Raw, None)
    }

    fn append(&self, key: Bytes, value: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::append(key, value), ExpectedShape::Raw, None)
    }

    fn strlen(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::strlen(key), ExpectedShape::Raw, None)
    }

    fn incr(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::incr(key), ExpectedShape::Raw, None)
    }

    fn incr_by(&self, key: Bytes, delta: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::incr_by(key, delta), ExpectedShape::Raw, None)
    }

    fn incr_by_float(&self, key: Bytes, delta: f64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::incr_by_float(key, delta), ExpectedShape::Raw, None)
    }

    fn decr(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::decr(key), ExpectedShape::Raw, None)
    }

    fn decr_by(&self, key: Bytes, delta: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::decr_by(key, delta), ExpectedShape::Raw, None)
    }

    fn set_range(&self, key: Bytes, offset: i64, value: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::set_range(key, offset, value), ExpectedShape::Raw, None)
    }

    fn get_range(&self, key: Bytes, start: i64, end: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(strings::get_range(key, start, end), ExpectedShape::Raw, None)
    }

    // -- hashes --

    fn hset(&self, key: Bytes, fields: impl IntoIterator<Item = (Bytes, Bytes)> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hset(key, fields), ExpectedShape::Raw, None)
    }

    fn hget(&self, key: Bytes, field: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hget(key, field), ExpectedShape::Raw, None)
    }

    fn hmget(&self, key: Bytes, fields: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hmget(key, fields), ExpectedShape::Raw, None)
    }

    fn hgetall(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hgetall(key), ExpectedShape::Raw, None)
    }

    fn hdel(&self, key: Bytes, fields: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hdel(key, fields), ExpectedShape::Raw, None)
    }

    fn hexists(&self, key: Bytes, field: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hexists(key, field), ExpectedShape::Raw, None)
    }

    fn hincr_by(&self, key: Bytes, field: Bytes, delta: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hincr_by(key, field, delta), ExpectedShape::Raw, None)
    }

    fn hincr_by_float(&self, key: Bytes, field: Bytes, delta: f64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hincr_by_float(key, field, delta), ExpectedShape::Raw, None)
    }

    fn hkeys(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hkeys(key), ExpectedShape::Raw, None)
    }

    fn hvals(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hvals(key), ExpectedShape::Raw, None)
    }

    fn hlen(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hlen(key), ExpectedShape::Raw, None)
    }

    fn hrandfield(&self, key: Bytes, count: Option<i64>, with_values: bool) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hrandfield(key, count, with_values), ExpectedShape::Raw, None)
    }

    fn hsetex(
        &self,
        key: Bytes,
        fields: impl IntoIterator<Item = (Bytes, Bytes)> + Send,
        options: HSetExOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = hashes::hsetex(key, fields, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn hgetex(
        &self,
        key: Bytes,
        fields: impl IntoIterator<Item = Bytes> + Send,
        options: HGetExOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = hashes::hgetex(key, fields, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn hscan(&self, key: Bytes, cursor: u64, options: HScanOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hashes::hscan(key, cursor, options), ExpectedShape::Raw, None)
    }

    // -- lists --

    fn push(&self, key: Bytes, end: ListEnd, values: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::push(key, end, values), ExpectedShape::Raw, None)
    }

    fn pop(&self, key: Bytes, end: ListEnd, count: Option<i64>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::pop(key, end, count), ExpectedShape::Raw, None)
    }

    fn lrange(&self, key: Bytes, start: i64, stop: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::lrange(key, start, stop), ExpectedShape::Raw, None)
    }

    fn llen(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::llen(key), ExpectedShape::Raw, None)
    }

    fn lrem(&self, key: Bytes, count: i64, value: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::lrem(key, count, value), ExpectedShape::Raw, None)
    }

    fn lindex(&self, key: Bytes, index: i64) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::lindex(key, index), ExpectedShape::Raw, None)
    }

    fn lset(&self, key: Bytes, index: i64, value: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::lset(key, index, value), ExpectedShape::Raw, None)
    }

    fn linsert(&self, key: Bytes, position: InsertPosition, pivot: Bytes, value: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(lists::linsert(key, position, pivot, value), ExpectedShape::Raw, None)
    }

    fn blocking_pop(
        &self,
        keys: impl IntoIterator<Item = Bytes> + Send,
        end: ListEnd,
        timeout_secs: f64,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(
            lists::blocking_pop(keys, end, timeout_secs),
            ExpectedShape::Raw,
            Some(blocking_timeout_override(timeout_secs)),
        )
    }

    // -- sets --

    fn sadd(&self, key: Bytes, members: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::sadd(key, members), ExpectedShape::Raw, None)
    }

    fn srem(&self, key: Bytes, members: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::srem(key, members), ExpectedShape::Raw, None)
    }

    fn smembers(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::smembers(key), ExpectedShape::Set, None)
    }

    fn scard(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::scard(key), ExpectedShape::Raw, None)
    }

    fn sismember(&self, key: Bytes, member: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::sismember(key, member), ExpectedShape::Raw, None)
    }

    fn set_op(&self, op: SetOp, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::set_op(op, keys), ExpectedShape::Set, None)
    }

    fn set_op_store(
        &self,
        op: SetOp,
        destination: Bytes,
        keys: impl IntoIterator<Item = Bytes> + Send,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::set_op_store(op, destination, keys), ExpectedShape::Raw, None)
    }

    fn sscan(&self, key: Bytes, cursor: u64, options: SScanOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sets::sscan(key, cursor, options), ExpectedShape::Raw, None)
    }

    // -- sorted sets --

    fn zadd(
        &self,
        key: Bytes,
        members: impl IntoIterator<Item = (f64, Bytes)> + Send,
        options: ZAddOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = sorted_sets::zadd(key, members, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn zscore(&self, key: Bytes, member: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zscore(key, member), ExpectedShape::Raw, None)
    }

    fn zrem(&self, key: Bytes, members: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zrem(key, members), ExpectedShape::Raw, None)
    }

    fn zcard(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zcard(key), ExpectedShape::Raw, None)
    }

    fn zincrby(&self, key: Bytes, delta: f64, member: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zincrby(key, delta, member), ExpectedShape::Raw, None)
    }

    fn zrank(&self, key: Bytes, member: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zrank(key, member), ExpectedShape::Raw, None)
    }

    fn zcount(&self, key: Bytes, min: crate::encoding::Boundary, max: crate::encoding::Boundary) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zcount(key, min, max), ExpectedShape::Raw, None)
    }

    fn zpop(&self, key: Bytes, end: PopEnd, count: Option<i64>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zpop(key, end, count), ExpectedShape::Raw, None)
    }

    fn blocking_zpop(
        &self,
        keys: impl IntoIterator<Item = Bytes> + Send,
        end: PopEnd,
        timeout_secs: f64,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(
            sorted_sets::blocking_zpop(keys, end, timeout_secs),
            ExpectedShape::Raw,
            Some(blocking_timeout_override(timeout_secs)),
        )
    }

    fn zrange(&self, key: Bytes, by: RangeBy, options: ZRangeOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = sorted_sets::zrange(key, by, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn zrangestore(
        &self,
        destination: Bytes,
        key: Bytes,
        by: RangeBy,
        options: ZRangeOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = sorted_sets::zrangestore(destination, key, by, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn zscan(&self, key: Bytes, cursor: u64, options: ZScanOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(sorted_sets::zscan(key, cursor, options), ExpectedShape::Raw, None)
    }

    // -- streams --

    fn xadd(
        &self,
        key: Bytes,
        id: StreamId,
        fields: impl IntoIterator<Item = (Bytes, Bytes)> + Send,
        options: streams::XAddOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = streams::xadd(key, id, fields, options)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    fn xrange(&self, key: Bytes, start: Bytes, end: Bytes, count: Option<i64>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xrange(key, start, end, count), ExpectedShape::Raw, None)
    }

    fn xlen(&self, key: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xlen(key), ExpectedShape::Raw, None)
    }

    fn xread(
        &self,
        streams_: impl IntoIterator<Item = (Bytes, Bytes)> + Send,
        count: Option<i64>,
        block_millis: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xread(streams_, count, block_millis), ExpectedShape::Raw, None)
    }

    fn xdel(&self, key: Bytes, ids: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xdel(key, ids), ExpectedShape::Raw, None)
    }

    fn xtrim(&self, key: Bytes, trim: TrimOptions) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xtrim(key, trim), ExpectedShape::Raw, None)
    }

    fn xgroup_create(&self, key: Bytes, group: Bytes, start_id: Bytes, mkstream: bool) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xgroup_create(key, group, start_id, mkstream), ExpectedShape::Raw, None)
    }

    fn xreadgroup(
        &self,
        group: Bytes,
        consumer: Bytes,
        streams_: impl IntoIterator<Item = (Bytes, Bytes)> + Send,
        count: Option<i64>,
        block_millis: Option<i64>,
        no_ack: bool,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(
            streams::xreadgroup(group, consumer, streams_, count, block_millis, no_ack),
            ExpectedShape::Raw,
            None,
        )
    }

    fn xack(&self, key: Bytes, group: Bytes, ids: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(streams::xack(key, group, ids), ExpectedShape::Raw, None)
    }

    // -- geospatial --

    fn geoadd(
        &self,
        key: Bytes,
        members: impl IntoIterator<Item = (GeoPoint, Bytes)> + Send,
        options: GeoAddOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(geo::geoadd(key, members, options), ExpectedShape::Raw, None)
    }

    fn geopos(&self, key: Bytes, members: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(geo::geopos(key, members), ExpectedShape::Raw, None)
    }

    fn geodist(&self, key: Bytes, member1: Bytes, member2: Bytes, unit: Option<DistanceUnit>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(geo::geodist(key, member1, member2, unit), ExpectedShape::Raw, None)
    }

    fn geosearch(
        &self,
        key: Bytes,
        from: FromPosition,
        shape: GeoShape,
        options: GeoSearchOptions,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(geo::geosearch(key, from, shape, options), ExpectedShape::Raw, None)
    }

    fn geosearchstore(
        &self,
        destination: Bytes,
        key: Bytes,
        from: FromPosition,
        shape: GeoShape,
        options: GeoSearchOptions,
        store_dist: bool,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        async move {
            let command = geo::geosearchstore(destination, key, from, shape, options, store_dist)?;
            self.send(command, ExpectedShape::Raw, None).await
        }
    }

    // -- HyperLogLog --

    fn pfadd(&self, key: Bytes, elements: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hyperloglog::pfadd(key, elements), ExpectedShape::Raw, None)
    }

    fn pfcount(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hyperloglog::pfcount(keys), ExpectedShape::Raw, None)
    }

    fn pfmerge(&self, destination: Bytes, sources: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(hyperloglog::pfmerge(destination, sources), ExpectedShape::Raw, None)
    }

    // -- scripting --

    fn eval(
        &self,
        script: Bytes,
        keys: impl IntoIterator<Item = Bytes> + Send,
        args: impl IntoIterator<Item = Bytes> + Send,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(scripting::eval(script, keys, args), ExpectedShape::Raw, None)
    }

    fn evalsha(
        &self,
        sha1: Bytes,
        keys: impl IntoIterator<Item = Bytes> + Send,
        args: impl IntoIterator<Item = Bytes> + Send,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(scripting::evalsha(sha1, keys, args), ExpectedShape::Raw, None)
    }

    fn script_load(&self, script: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(scripting::script_load(script), ExpectedShape::Raw, None)
    }

    fn fcall(
        &self,
        function: Bytes,
        keys: impl IntoIterator<Item = Bytes> + Send,
        args: impl IntoIterator<Item = Bytes> + Send,
        read_only: bool,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(scripting::fcall(function, keys, args, read_only), ExpectedShape::Raw, None)
    }

    fn function_load(&self, code: Bytes, replace: bool) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(scripting::function_load(code, replace), ExpectedShape::Raw, None)
    }

    // -- server / management --

    fn ping(&self, message: Option<Bytes>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::ping(message), ExpectedShape::Raw, None)
    }

    fn echo(&self, message: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::echo(message), ExpectedShape::Raw, None)
    }

    fn dbsize(&self) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::dbsize(), ExpectedShape::Raw, None)
    }

    fn flushall(&self, mode: Option<FlushMode>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::flushall(mode), ExpectedShape::Raw, None)
    }

    fn flushdb(&self, mode: Option<FlushMode>) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::flushdb(mode), ExpectedShape::Raw, None)
    }

    fn info(&self, sections: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::info(sections), ExpectedShape::Raw, None)
    }

    fn client_getname(&self) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::client_getname(), ExpectedShape::Raw, None)
    }

    fn client_setname(&self, name: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::client_setname(name), ExpectedShape::Raw, None)
    }

    fn config_get(&self, parameters: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::config_get(parameters), ExpectedShape::Raw, None)
    }

    fn config_set(&self, pairs: impl IntoIterator<Item = (Bytes, Bytes)> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::config_set(pairs), ExpectedShape::Raw, None)
    }

    fn cluster_info(&self) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::cluster_info(), ExpectedShape::Raw, None)
    }

    fn time(&self) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(server::time(), ExpectedShape::Raw, None)
    }

    // -- transactions --

    /// `WATCH`. Only meaningful immediately before assembling an atomic
    /// [`Batch`] on the same connection (§4.3) — this crate does not track
    /// watched keys itself.
    fn watch(&self, keys: impl IntoIterator<Item = Bytes> + Send) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(transactions::watch(keys), ExpectedShape::Raw, None)
    }

    fn unwatch(&self) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(transactions::unwatch(), ExpectedShape::Raw, None)
    }

    // -- pub/sub command factories (subscription bookkeeping lives on the
    // concrete facades, which also update their `PubSubState`) --

    fn publish(&self, channel: Bytes, message: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(pubsub::publish(channel, message), ExpectedShape::Raw, None)
    }

    fn spublish(&self, shard_channel: Bytes, message: Bytes) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.send(pubsub::spublish(shard_channel, message), ExpectedShape::Raw, None)
    }
}

impl<T: Dispatch> Commands for T {}

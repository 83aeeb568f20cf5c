//! The command record (C2): the tagged value every command factory (C3)
//! produces, and the closed [`RequestType`] enumeration shared with the
//! transport.

use bytes::Bytes;

/// An ordered argument vector, exactly as it will appear on the wire after
/// the request-type keyword: raw byte strings in server-grammar order.
pub type ArgVec = Vec<Bytes>;

/// The canonical, closed enumeration of request types this crate knows how
/// to construct. Per the source project's design notes, two parallel
/// enumerations existed historically (`GetString`/`Get`, `Zadd`/`ZAdd`); this
/// crate keeps exactly one, using the newer naming convention throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RequestType {
    // -- generic key space --
    Del,
    Unlink,
    Exists,
    Expire,
    PExpire,
    ExpireAt,
    PExpireAt,
    Ttl,
    PTtl,
    Persist,
    Type,
    Rename,
    RenameNx,
    Copy,
    Scan,

    // -- strings / numeric --
    Set,
    Get,
    GetEx,
    GetDel,
    MGet,
    MSet,
    Append,
    StrLen,
    Incr,
    IncrBy,
    IncrByFloat,
    Decr,
    DecrBy,
    SetRange,
    GetRange,

    // -- hashes --
    HSet,
    HGet,
    HMGet,
    HGetAll,
    HDel,
    HExists,
    HIncrBy,
    HIncrByFloat,
    HKeys,
    HVals,
    HLen,
    HSetEx,
    HGetEx,
    HRandField,
    HScan,

    // -- lists --
    LPush,
    RPush,
    LPop,
    RPop,
    LRange,
    LLen,
    LRem,
    LIndex,
    LSet,
    LInsert,
    BLPop,
    BRPop,

    // -- sets --
    SAdd,
    SRem,
    SMembers,
    SCard,
    SIsMember,
    SInter,
    SUnion,
    SDiff,
    SInterStore,
    SUnionStore,
    SDiffStore,
    SScan,

    // -- sorted sets --
    ZAdd,
    ZScore,
    ZRange,
    ZRangeStore,
    ZRem,
    ZCard,
    ZIncrBy,
    ZRank,
    ZCount,
    ZPopMin,
    ZPopMax,
    BZPopMin,
    BZPopMax,
    ZScan,

    // -- streams --
    XAdd,
    XRange,
    XLen,
    XRead,
    XDel,
    XTrim,
    XGroupCreate,
    XReadGroup,
    XAck,

    // -- pub/sub --
    Subscribe,
    Unsubscribe,
    PSubscribe,
    PUnsubscribe,
    SSubscribe,
    SUnsubscribe,
    Publish,
    SPublish,

    // -- geospatial --
    GeoAdd,
    GeoPos,
    GeoDist,
    GeoSearch,
    GeoSearchStore,

    // -- HyperLogLog --
    PfAdd,
    PfCount,
    PfMerge,

    // -- scripting --
    Eval,
    EvalSha,
    ScriptLoad,
    FCall,
    FCallReadOnly,
    FunctionLoad,

    // -- server / management --
    Ping,
    Echo,
    DbSize,
    FlushAll,
    FlushDb,
    Info,
    ClientGetName,
    ClientSetName,
    ConfigGet,
    ConfigSet,
    ClusterInfo,
    Time,
    Select,

    // -- transactions --
    Watch,
    Unwatch,
    Multi,
    Exec,
    Discard,
}

impl RequestType {
    /// The textual command name sent as the first argument on the wire. For
    /// multi-word commands (`CONFIG GET`, `XGROUP CREATE`, ...) this is the
    /// full sequence of keyword tokens; callers append positional arguments
    /// after it.
    pub fn command_tokens(self) -> &'static [&'static str] {
        use RequestType::*;
        match self {
            Del => &["DEL"],
            Unlink => &["UNLINK"],
            Exists => &["EXISTS"],
            Expire => &["EXPIRE"],
            PExpire => &["PEXPIRE"],
            ExpireAt => &["EXPIREAT"],
            PExpireAt => &["PEXPIREAT"],
            Ttl => &["TTL"],
            PTtl => &["PTTL"],
            Persist => &["PERSIST"],
            Type => &["TYPE"],
            Rename => &["RENAME"],
            RenameNx => &["RENAMENX"],
            Copy => &["COPY"],
            Scan => &["SCAN"],

            Set => &["SET"],
            Get => &["GET"],
            GetEx => &["GETEX"],
            GetDel => &["GETDEL"],
            MGet => &["MGET"],
            MSet => &["MSET"],
            Append => &["APPEND"],
            StrLen => &["STRLEN"],
            Incr => &["INCR"],
            IncrBy => &["INCRBY"],
            IncrByFloat => &["INCRBYFLOAT"],
            Decr => &["DECR"],
            DecrBy => &["DECRBY"],
            SetRange => &["SETRANGE"],
            GetRange => &["GETRANGE"],

            HSet => &["HSET"],
            HGet => &["HGET"],
            HMGet => &["HMGET"],
            HGetAll => &["HGETALL"],
            HDel => &["HDEL"],
            HExists => &["HEXISTS"],
            HIncrBy => &["HINCRBY"],
            HIncrByFloat => &["HINCRBYFLOAT"],
            HKeys => &["HKEYS"],
            HVals => &["HVALS"],
            HLen => &["HLEN"],
            HSetEx => &["HSETEX"],
            HGetEx => &["HGETEX"],
            HRandField => &["HRANDFIELD"],
            HScan => &["HSCAN"],

            LPush => &["LPUSH"],
            RPush => &["RPUSH"],
            LPop => &["LPOP"],
            RPop => &["RPOP"],
            LRange => &["LRANGE"],
            LLen => &["LLEN"],
            LRem => &["LREM"],
            LIndex => &["LINDEX"],
            LSet => &["LSET"],
            LInsert => &["LINSERT"],
            BLPop => &["BLPOP"],
            BRPop => &["BRPOP"],

            SAdd => &["SADD"],
            SRem => &["SREM"],
            SMembers => &["SMEMBERS"],
            SCard => &["SCARD"],
            SIsMember => &["SISMEMBER"],
            SInter => &["SINTER"],
            SUnion => &["SUNION"],
            SDiff => &["SDIFF"],
            SInterStore => &["SINTERSTORE"],
            SUnionStore => &["SUNIONSTORE"],
            SDiffStore => &["SDIFFSTORE"],
            SScan => &["SSCAN"],

            ZAdd => &["ZADD"],
            ZScore => &["ZSCORE"],
            ZRange => &["ZRANGE"],
            ZRangeStore => &["ZRANGESTORE"],
            ZRem => &["ZREM"],
            ZCard => &["ZCARD"],
            ZIncrBy => &["ZINCRBY"],
            ZRank => &["ZRANK"],
            ZCount => &["ZCOUNT"],
            ZPopMin => &["ZPOPMIN"],
            ZPopMax => &["ZPOPMAX"],
            BZPopMin => &["BZPOPMIN"],
            BZPopMax => &["BZPOPMAX"],
            ZScan => &["ZSCAN"],

            XAdd => &["XADD"],
            XRange => &["XRANGE"],
            XLen => &["XLEN"],
            XRead => &["XREAD"],
            XDel => &["XDEL"],
            XTrim => &["XTRIM"],
            XGroupCreate => &["XGROUP", "CREATE"],
            XReadGroup => &["XREADGROUP"],
            XAck => &["XACK"],

            Subscribe => &["SUBSCRIBE"],
            Unsubscribe => &["UNSUBSCRIBE"],
            PSubscribe => &["PSUBSCRIBE"],
            PUnsubscribe => &["PUNSUBSCRIBE"],
            SSubscribe => &["SSUBSCRIBE"],
            SUnsubscribe => &["SUNSUBSCRIBE"],
            Publish => &["PUBLISH"],
            SPublish => &["SPUBLISH"],

            GeoAdd => &["GEOADD"],
            GeoPos => &["GEOPOS"],
            GeoDist => &["GEODIST"],
            GeoSearch => &["GEOSEARCH"],
            GeoSearchStore => &["GEOSEARCHSTORE"],

            PfAdd => &["PFADD"],
            PfCount => &["PFCOUNT"],
            PfMerge => &["PFMERGE"],

            Eval => &["EVAL"],
            EvalSha => &["EVALSHA"],
            ScriptLoad => &["SCRIPT", "LOAD"],
            FCall => &["FCALL"],
            FCallReadOnly => &["FCALL_RO"],
            FunctionLoad => &["FUNCTION", "LOAD"],

            Ping => &["PING"],
            Echo => &["ECHO"],
            DbSize => &["DBSIZE"],
            FlushAll => &["FLUSHALL"],
            FlushDb => &["FLUSHDB"],
            Info => &["INFO"],
            ClientGetName => &["CLIENT", "GETNAME"],
            ClientSetName => &["CLIENT", "SETNAME"],
            ConfigGet => &["CONFIG", "GET"],
            ConfigSet => &["CONFIG", "SET"],
            ClusterInfo => &["CLUSTER", "INFO"],
            Time => &["TIME"],
            Select => &["SELECT"],

            Watch => &["WATCH"],
            Unwatch => &["UNWATCH"],
            Multi => &["MULTI"],
            Exec => &["EXEC"],
            Discard => &["DISCARD"],
        }
    }
}

/// The argument payload of a [`Command`] before it has been handed to a
/// transport: always the inline form. Command factories are pure and never
/// touch the transport, so the threshold-based promotion to the
/// leaked-vector handle form happens later, when the multiplexer submits the
/// command (see [`crate::multiplexer::Multiplexer::submit`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub request_type: RequestType,
    pub args: ArgVec,
}

impl Command {
    pub fn new(request_type: RequestType, args: ArgVec) -> Self {
        Command { request_type, args }
    }

    /// Full argument vector including the command's leading keyword tokens,
    /// exactly as the server grammar expects.
    pub fn full_args(&self) -> ArgVec {
        let mut out = Vec::with_capacity(self.request_type.command_tokens().len() + self.args.len());
        out.extend(
            self.request_type
                .command_tokens()
                .iter()
                .map(|tok| Bytes::from_static(tok.as_bytes())),
        );
        out.extend(self.args.iter().cloned());
        out
    }

    /// Summed byte length of the full wire argument vector, used by the
    /// multiplexer to decide between the inline and leaked-vector handle
    /// forms of the eventual [`Payload`].
    pub fn wire_len(&self) -> usize {
        self.request_type
            .command_tokens()
            .iter()
            .map(|tok| tok.len())
            .sum::<usize>()
            + self.args.iter().map(Bytes::len).sum::<usize>()
    }
}

/// The wire-level payload of a command once it has been submitted: either
/// the argument vector inline, or a handle to a transport-owned buffer for
/// oversize payloads. See §3's "Command Record" data model: the handle
/// variant carries the two 32-bit halves of a 64-bit pointer/length pair;
/// implementations must treat them as opaque and never reconstruct a
/// pointer client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Inline(ArgVec),
    Handle { low: u32, high: u32 },
}

/// A fully materialized Command Record, ready to be framed onto the IPC
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub request_type: RequestType,
    pub payload: Payload,
}

/// A cluster-only routing hint (§4.7), carried alongside a [`CommandRecord`]
/// on the outgoing frame. Standalone connections never attach one — the
/// transport implicitly targets the single server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHint {
    /// Any node chosen by the transport, typically for reads that tolerate
    /// any replica.
    Random,
    /// Fan out to every primary, e.g. for `FLUSHALL`-style administrative
    /// commands.
    AllPrimaries,
    /// Fan out to every node, primaries and replicas alike.
    AllNodes,
    /// The single node owning the hash slot `key` maps to.
    SlotKey(Bytes),
    /// A specific node by address, bypassing slot ownership entirely.
    Address { host: String, port: u16 },
}

#[cfg(test)]
mod test;

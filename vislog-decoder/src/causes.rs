//! Static Xtensa/ESP lookup tables
//!
//! Register-id-to-name mapping for the coredump extra-info entries and the
//! exception-cause table (Xtensa ISA causes, ESP panic pseudo-causes and
//! the invalid-value sentinel). Both are fixed, finite tables.

use crate::types::ExceptionCause;

/// Sentinel the coredump writer stores when EXCCAUSE could not be read
pub(crate) const INVALID_CAUSE: u32 = 0xFFFF;

/// Register name for an extra-info entry id
///
/// Ids are Xtensa special-register numbers; unknown ids are ignored by the
/// caller.
pub(crate) fn register_name(id: u32) -> Option<&'static str> {
    Some(match id {
        177 => "EPC1",
        178 => "EPC2",
        179 => "EPC3",
        180 => "EPC4",
        181 => "EPC5",
        182 => "EPC6",
        183 => "EPC7",
        194 => "EPS2",
        195 => "EPS3",
        196 => "EPS4",
        197 => "EPS5",
        198 => "EPS6",
        199 => "EPS7",
        232 => "EXCCAUSE",
        238 => "EXCVADDR",
        _ => return None,
    })
}

/// Exception causes: codes 0-39 from the Xtensa ISA manual, 64-71 from the
/// ESP panic handler, plus the invalid-value sentinel
const EXCEPTION_CAUSES: &[(u32, &str, &str)] = &[
    (0, "IllegalInstructionCause", "Illegal instruction"),
    (1, "SyscallCause", "SYSCALL instruction"),
    (
        2,
        "InstructionFetchErrorCause",
        "Processor internal physical address or data error during instruction fetch",
    ),
    (
        3,
        "LoadStoreErrorCause",
        "Processor internal physical address or data error during load or store",
    ),
    (
        4,
        "Level1InterruptCause",
        "Level-1 interrupt as indicated by set level-1 bits in the INTERRUPT register",
    ),
    (
        5,
        "AllocaCause",
        "MOVSP instruction, if caller's registers are not in the register file",
    ),
    (
        6,
        "IntegerDivideByZeroCause",
        "QUOS, QUOU, REMS, or REMU divisor operand is zero",
    ),
    (
        8,
        "PrivilegedCause",
        "Attempt to execute a privileged operation when CRING != 0",
    ),
    (
        9,
        "LoadStoreAlignmentCause",
        "Load or store to an unaligned address",
    ),
    (
        12,
        "InstrPIFDataErrorCause",
        "PIF data error during instruction fetch",
    ),
    (
        13,
        "LoadStorePIFDataErrorCause",
        "Synchronous PIF data error during LoadStore access",
    ),
    (
        14,
        "InstrPIFAddrErrorCause",
        "PIF address error during instruction fetch",
    ),
    (
        15,
        "LoadStorePIFAddrErrorCause",
        "Synchronous PIF address error during LoadStore access",
    ),
    (16, "InstTLBMissCause", "Error during Instruction TLB refill"),
    (
        17,
        "InstTLBMultiHitCause",
        "Multiple instruction TLB entries matched",
    ),
    (
        18,
        "InstFetchPrivilegeCause",
        "An instruction fetch referenced a virtual address at a ring level less than CRING",
    ),
    (
        20,
        "InstFetchProhibitedCause",
        "An instruction fetch referenced a page mapped with an attribute that does not permit instruction fetch",
    ),
    (
        24,
        "LoadStoreTLBMissCause",
        "Error during TLB refill for a load or store",
    ),
    (
        25,
        "LoadStoreTLBMultiHitCause",
        "Multiple TLB entries matched for a load or store",
    ),
    (
        26,
        "LoadStorePrivilegeCause",
        "A load or store referenced a virtual address at a ring level less than CRING",
    ),
    (
        28,
        "LoadProhibitedCause",
        "A load referenced a page mapped with an attribute that does not permit loads",
    ),
    (
        29,
        "StoreProhibitedCause",
        "A store referenced a page mapped with an attribute that does not permit stores",
    ),
    (
        32,
        "Coprocessor0Disabled",
        "Coprocessor 0 instruction when cp0 disabled",
    ),
    (
        33,
        "Coprocessor1Disabled",
        "Coprocessor 1 instruction when cp1 disabled",
    ),
    (
        34,
        "Coprocessor2Disabled",
        "Coprocessor 2 instruction when cp2 disabled",
    ),
    (
        35,
        "Coprocessor3Disabled",
        "Coprocessor 3 instruction when cp3 disabled",
    ),
    (
        36,
        "Coprocessor4Disabled",
        "Coprocessor 4 instruction when cp4 disabled",
    ),
    (
        37,
        "Coprocessor5Disabled",
        "Coprocessor 5 instruction when cp5 disabled",
    ),
    (
        38,
        "Coprocessor6Disabled",
        "Coprocessor 6 instruction when cp6 disabled",
    ),
    (
        39,
        "Coprocessor7Disabled",
        "Coprocessor 7 instruction when cp7 disabled",
    ),
    (64, "UnknownException", "Unknown exception"),
    (65, "DebugException", "Unhandled debug exception"),
    (66, "DoubleException", "Double exception"),
    (67, "KernelException", "Unhandled kernel exception"),
    (68, "CoprocessorException", "Coprocessor exception"),
    (69, "InterruptWDTTimeoutCPU0", "Interrupt wdt timeout on CPU0"),
    (70, "InterruptWDTTimeoutCPU1", "Interrupt wdt timeout on CPU1"),
    (
        71,
        "CacheError",
        "Cache disabled but cached memory region accessed",
    ),
    (
        INVALID_CAUSE,
        "InvalidCauseRegister",
        "Invalid EXCCAUSE register value or current task is broken and was skipped",
    ),
];

/// Look up an EXCCAUSE value; unrecognized codes are simply absent
pub(crate) fn lookup_cause(code: u32) -> Option<ExceptionCause> {
    EXCEPTION_CAUSES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(code, name, description)| ExceptionCause {
            code,
            name,
            description,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_name_mapping() {
        assert_eq!(register_name(232), Some("EXCCAUSE"));
        assert_eq!(register_name(238), Some("EXCVADDR"));
        assert_eq!(register_name(177), Some("EPC1"));
        assert_eq!(register_name(199), Some("EPS7"));
        assert_eq!(register_name(0), None);
        assert_eq!(register_name(12345), None);
    }

    #[test]
    fn test_cause_lookup() {
        let cause = lookup_cause(6).unwrap();
        assert_eq!(cause.name, "IntegerDivideByZeroCause");
        let sentinel = lookup_cause(INVALID_CAUSE).unwrap();
        assert_eq!(sentinel.name, "InvalidCauseRegister");
    }

    #[test]
    fn test_unrecognized_cause_is_absent() {
        assert_eq!(lookup_cause(7), None);
        assert_eq!(lookup_cause(63), None);
        assert_eq!(lookup_cause(72), None);
    }
}

//! Outreach message drafting: plain string formatting over one classified
//! client and the operator profile.

use rm_copilot_core::{
    classifier::{ClassifiedClient, OpportunityTag, PAYROLL_POTENTIAL_RATE, SME_LOAN_POTENTIAL_RATE},
    config::OperatorProfile,
};

/// Product pitch matching the client's opportunity tag.
pub fn outreach_script(client: &ClassifiedClient, op: &OperatorProfile) -> String {
    let name = client.name();
    let giro = client.record.giro_balance;

    match client.tag() {
        OpportunityTag::TargetSmeLoan => format!(
            "Good morning,\n\n\
             I am {op_name}, Relationship Manager at the {branch} branch.\n\n\
             Thank you for trusting us with {name}'s giro account. Your business activity \
             has been strong, with an average balance of {giro}M.\n\n\
             To support your growth we would like to offer a Working Capital Loan:\n\
             - Limit up to {limit:.1}M\n\
             - Flexible 12-24 month tenor\n\
             - Approval within 3 business days\n\n\
             Could we schedule a meeting this week?\n\n\
             Regards,\n{op_name}\nRM {branch}\n{phone}",
            op_name = op.name,
            branch = op.branch,
            phone = op.phone,
            limit = giro * SME_LOAN_POTENTIAL_RATE,
        ),
        OpportunityTag::TargetPayroll => format!(
            "Good morning,\n\n\
             I am {op_name}, the RM handling the {name} account.\n\n\
             We appreciate our partnership and your average giro balance of {giro}M.\n\n\
             I would like to introduce our payroll service:\n\
             - Automated salary disbursement\n\
             - No-cost intra-bank transfers\n\
             - Real-time monitoring dashboard\n\n\
             For {name} the estimated fee is only {fee:.1}M/month.\n\n\
             May I arrange a short demo with your HR team this week?\n\n\
             Best regards,\n{op_name}\nRM {branch}\n{phone}",
            op_name = op.name,
            branch = op.branch,
            phone = op.phone,
            fee = giro * PAYROLL_POTENTIAL_RATE,
        ),
        OpportunityTag::Maintain => format!(
            "Good morning,\n\n\
             I am {op_name} from the {branch} branch.\n\n\
             Thank you for trusting us with {name}'s banking. I am calling to make sure \
             all services are running well.\n\n\
             Is there anything else we can help with?\n\n\
             Regards,\n{op_name}\n{phone}",
            op_name = op.name,
            branch = op.branch,
            phone = op.phone,
        ),
    }
}

/// Greeting for a long-standing client, quoting the last contact note.
pub fn relationship_script(client: &ClassifiedClient, op: &OperatorProfile) -> String {
    let name = client.name();
    let tenure = client.record.tenure_years;
    format!(
        "Dear leadership of {name},\n\n\
         I am {op_name}, the new Relationship Manager at the {branch} branch.\n\n\
         {name} has banked with us for {tenure} years, and we are grateful for that trust.\n\n\
         From our notes: \"{note}\"\n\n\
         I would like to introduce myself, make sure every service runs smoothly and hear \
         any new needs. May I schedule a courtesy visit this week?\n\n\
         Warm regards,\n{op_name}\nRM {branch}\n{phone}\n\n\
         Loyalty status: {tier} Member",
        op_name = op.name,
        branch = op.branch,
        phone = op.phone,
        note = client.record.last_note,
        tier = client.loyalty(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rm_copilot_core::{
        classifier::classify_client,
        client::{ClientRecord, ProductStatus, TransactionFrequency},
        config::Thresholds,
    };

    fn client(balance: f64, sme: ProductStatus, payroll: ProductStatus) -> ClassifiedClient {
        let record = ClientRecord::new(
            "PT. Lestari Makmur",
            balance,
            TransactionFrequency::High,
            sme,
            payroll,
            18,
            40,
            "Third-generation family business",
        )
        .unwrap();
        classify_client(record, &Thresholds::default())
    }

    #[test]
    fn sme_pitch_quotes_loan_limit() {
        let script = outreach_script(
            &client(2500.0, ProductStatus::None, ProductStatus::Active),
            &OperatorProfile::default(),
        );
        assert!(script.contains("Working Capital Loan"));
        assert!(script.contains("1750.0M"));
        assert!(script.contains("Budi Santoso"));
    }

    #[test]
    fn payroll_pitch_quotes_fee() {
        let script = outreach_script(
            &client(1200.0, ProductStatus::Active, ProductStatus::None),
            &OperatorProfile::default(),
        );
        assert!(script.contains("60.0M/month"));
    }

    #[test]
    fn greeting_mentions_tenure_note_and_tier() {
        let script = relationship_script(
            &client(500.0, ProductStatus::Active, ProductStatus::Active),
            &OperatorProfile::default(),
        );
        assert!(script.contains("18 years"));
        assert!(script.contains("Third-generation family business"));
        assert!(script.contains("Platinum Member"));
    }
}
